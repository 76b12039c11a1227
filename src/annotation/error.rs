// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Annotation specific errors

use core::fmt;

use super::Signal;

/// Errors arising from a trace line's annotations
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A value is not a valid hexadecimal number
    InvalidValue(Signal, String),
    /// A signal required for the line's source is absent
    MissingSignal(Signal),
    /// A signal's value lies outside the range it may take
    ///
    /// This applies to register indices, transfer sizes, formats and other
    /// enumerated values.
    OutOfRange(Signal, u64),
}

impl core::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(signal, value) => {
                write!(f, "invalid value \"{value}\" for signal '{signal}'")
            }
            Self::MissingSignal(signal) => write!(f, "missing signal '{signal}'"),
            Self::OutOfRange(signal, value) => {
                write!(f, "value {value:#x} out of range for signal '{signal}'")
            }
        }
    }
}
