// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Trace lines
//!
//! A trace consists of one line per committed instruction slot in the format
//!
//! ```text
//! <sim-time> <cycle> <priv-digit> <hex-pc> <disassembly>[#; <annotations>]
//! ```
//!
//! This module provides the parsed input [`Line`] and the [`Annotated`] output
//! line.

pub mod error;

#[cfg(test)]
mod tests;

use core::fmt;
use core::str::FromStr;

use crate::types::Privilege;

pub use error::Error;

/// Simulation time and cycle of a trace line
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Timestamp {
    /// Simulation time, usually in picoseconds
    pub time: u64,
    /// Clock cycle
    pub cycle: u64,
}

impl Timestamp {
    /// Simulation time in the unit used for performance segments
    pub fn time_ns(&self) -> f64 {
        self.time as f64 / 1000.0
    }
}

/// A single parsed input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line<'a> {
    pub timestamp: Timestamp,
    pub privilege: Privilege,
    /// The program counter as it appears in the trace
    ///
    /// The PC may contain `x` or `z` digits if the simulator did not drive a
    /// defined value.
    pub pc: &'a str,
    /// The disassembled instruction, without trailing whitespace
    pub insn: &'a str,
    /// The annotation text following `#;`, if any
    pub annotations: Option<&'a str>,
}

impl<'a> Line<'a> {
    /// Parse a single trace line
    pub fn parse(line: &'a str) -> Result<Self, Error> {
        let malformed = || Error::Malformed(line.trim_end().into());

        let rest = line.trim_start();
        let (time, rest) = next_field(rest).ok_or_else(malformed)?;
        let (cycle, rest) = next_field(rest).ok_or_else(malformed)?;
        let (privilege, rest) = next_field(rest).ok_or_else(malformed)?;
        let (pc, rest) = next_field(rest).ok_or_else(malformed)?;

        let timestamp = Timestamp {
            time: parse_decimal(time).ok_or_else(malformed)?,
            cycle: parse_decimal(cycle).ok_or_else(malformed)?,
        };
        let privilege = parse_decimal(privilege).ok_or_else(malformed)?;
        let privilege = u8::try_from(privilege)
            .ok()
            .and_then(|p| Privilege::try_from(p).ok())
            .ok_or(Error::UnknownPrivilege(privilege))?;

        let digits = pc.strip_prefix("0x").ok_or_else(malformed)?;
        if digits.is_empty() || !digits.chars().all(is_pc_digit) {
            return Err(malformed());
        }

        let end = rest.find(['#', ';']).unwrap_or(rest.len());
        let (insn, rest) = rest.split_at(end);
        let annotations = rest
            .strip_prefix("#;")
            .map(str::trim)
            .filter(|a| !a.is_empty());

        Ok(Self {
            timestamp,
            privilege,
            pc,
            insn: insn.trim_end(),
            annotations,
        })
    }

    /// Retrieve the numeric value of the PC, if it is fully defined
    pub fn address(&self) -> Option<u64> {
        u64::from_str_radix(self.pc.trim_start_matches("0x"), 16).ok()
    }
}

/// Split off the next whitespace-delimited field
fn next_field(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    let (field, rest) = text.split_at(end);
    (!field.is_empty()).then_some((field, rest.trim_start()))
}

fn parse_decimal(text: &str) -> Option<u64> {
    text.bytes()
        .all(|b| b.is_ascii_digit())
        .then(|| u64::from_str(text).ok())
        .flatten()
}

fn is_pc_digit(c: char) -> bool {
    c.is_ascii_hexdigit() || c == 'z' || c == 'x'
}

/// A single line of annotated output
///
/// The [`Display`][fmt::Display] impl renders the line in fixed-width
/// columns, followed by `#; <annotation>` for annotated lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotated {
    /// Timestamp to show, `None` if it was already shown on the previous line
    pub timestamp: Option<Timestamp>,
    pub privilege: Privilege,
    pub pc: String,
    pub insn: String,
    /// Annotation, `None` for vanilla lines
    pub annotation: Option<String>,
}

impl fmt::Display for Annotated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ts) = self.timestamp {
            write!(f, "{:>8} {:>8} ", ts.time, ts.cycle)?;
        } else {
            write!(f, "{:>8} {:>8} ", "", "")?;
        }
        write!(
            f,
            "{:>8} {:>10} {:<30}",
            self.privilege.to_string(),
            self.pc,
            self.insn
        )?;
        if let Some(annotation) = self.annotation.as_ref() {
            write!(f, " #; {annotation}")?;
        }
        Ok(())
    }
}
