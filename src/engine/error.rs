// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Engine specific errors

use core::fmt;

use crate::{annotation, trace};

use super::Writer;

/// Errors that may occur while processing a trace line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The line could not be parsed
    Line(trace::Error),
    /// The line's annotations are invalid or incomplete
    Annotation(annotation::Error),
    /// The line declares a source unknown to this engine
    ///
    /// This usually indicates a mismatch between the engine and the simulator
    /// producing the trace.
    UnknownSource(u64),
    /// An inconsistency was reported as fatal by the [`Policy`][super::Policy]
    Inconsistent(Inconsistency),
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Line(inner) => Some(inner),
            Self::Annotation(inner) => Some(inner),
            Self::Inconsistent(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(_) => write!(f, "cannot parse trace line"),
            Self::Annotation(_) => write!(f, "cannot interpret annotations"),
            Self::UnknownSource(source) => write!(f, "unknown trace source {source}"),
            Self::Inconsistent(_) => write!(f, "inconsistent trace"),
        }
    }
}

impl From<trace::Error> for Error {
    fn from(e: trace::Error) -> Self {
        Self::Line(e)
    }
}

impl From<annotation::Error> for Error {
    fn from(e: annotation::Error) -> Self {
        Self::Annotation(e)
    }
}

impl From<Inconsistency> for Error {
    fn from(e: Inconsistency) -> Self {
        Self::Inconsistent(e)
    }
}

/// Inconsistency in the state reconstructed from a trace
///
/// Inconsistencies usually stem from incomplete or truncated traces. Whether
/// they are fatal is up to the [`Policy`][super::Policy].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inconsistency {
    /// A register writeback without any write in flight for that register
    WritebackUnderflow {
        cycle: u64,
        writer: Writer,
        register: String,
    },
    /// A hardware loop's body contains another loop
    NestedLoop { cycle: u64, header: Option<String> },
    /// A loop configuration was buffered without any loop header offloaded
    MissingLoopHeader { cycle: u64 },
    /// A loop header was issued without any buffered loop configuration
    MissingLoopConfig { cycle: u64 },
    /// The FP subsystem issued an instruction which was never offloaded
    MissingOffload { cycle: u64 },
}

impl core::error::Error for Inconsistency {}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WritebackUnderflow {
                cycle,
                writer,
                register,
            } => write!(
                f,
                "In cycle {cycle}, {} attempts writeback to {register}, but none in flight.",
                writer.name().to_uppercase()
            ),
            Self::NestedLoop { cycle, header } => write!(
                f,
                "In cycle {cycle}, FRep at {} contains another nested FRep.",
                header.as_deref().unwrap_or("<unknown>")
            ),
            Self::MissingLoopHeader { cycle } => write!(
                f,
                "In cycle {cycle}, sequencer buffers a configuration, but no FRep was offloaded."
            ),
            Self::MissingLoopConfig { cycle } => write!(
                f,
                "In cycle {cycle}, FRep is issued, but no configuration was buffered."
            ),
            Self::MissingOffload { cycle } => write!(
                f,
                "In cycle {cycle}, FPSS issues an instruction, but none was offloaded."
            ),
        }
    }
}
