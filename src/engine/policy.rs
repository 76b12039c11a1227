// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Inconsistency reporting policies

use crate::config::Options;

use super::error::Inconsistency;

/// Policy for handling [`Inconsistency`]s
///
/// The [`Engine`][super::Engine] reports every [`Inconsistency`] it detects
/// to its policy. The policy decides whether processing continues (by
/// returning `Ok`) or whether the inconsistency is fatal (by returning it as
/// an error).
pub trait Policy {
    /// Report an [`Inconsistency`]
    fn report(&mut self, issue: Inconsistency) -> Result<(), Inconsistency>;
}

impl<P: Policy + ?Sized> Policy for &mut P {
    fn report(&mut self, issue: Inconsistency) -> Result<(), Inconsistency> {
        P::report(self, issue)
    }
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn report(&mut self, issue: Inconsistency) -> Result<(), Inconsistency> {
        P::report(self.as_mut(), issue)
    }
}

/// [`Policy`] treating every [`Inconsistency`] as fatal
#[derive(Copy, Clone, Debug, Default)]
pub struct Strict;

impl Policy for Strict {
    fn report(&mut self, issue: Inconsistency) -> Result<(), Inconsistency> {
        Err(issue)
    }
}

/// [`Policy`] logging every [`Inconsistency`] as a warning and continuing
#[derive(Copy, Clone, Debug, Default)]
pub struct Permissive;

impl Policy for Permissive {
    fn report(&mut self, issue: Inconsistency) -> Result<(), Inconsistency> {
        tracing::warn!("{issue}");
        Ok(())
    }
}

/// [`Policy`] collecting all [`Inconsistency`]s and continuing
#[derive(Clone, Debug, Default)]
pub struct Collect {
    pub issues: Vec<Inconsistency>,
}

impl Policy for Collect {
    fn report(&mut self, issue: Inconsistency) -> Result<(), Inconsistency> {
        self.issues.push(issue);
        Ok(())
    }
}

/// Create the [`Policy`] selected via [`Options::permissive`]
pub fn from_options(options: &Options) -> Box<dyn Policy> {
    if options.permissive {
        Box::new(Permissive)
    } else {
        Box::new(Strict)
    }
}
