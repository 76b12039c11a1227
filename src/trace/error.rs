// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

use core::fmt;

/// Trace line parsing errors
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The line does not follow the trace line format
    Malformed(String),
    /// The privilege digit does not denote a known privilege level
    UnknownPrivilege(u64),
}

impl core::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(line) => write!(f, "not a valid trace line: \"{line}\""),
            Self::UnknownPrivilege(p) => write!(f, "unknown privilege level {p}"),
        }
    }
}
