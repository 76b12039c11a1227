// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Side-channel annotations of trace lines
//!
//! Annotated trace lines carry a dictionary of microarchitectural signals in
//! the form `'key1': 0xNN, 'key2': 0xMM, ...`. This module provides the closed
//! set of known [`Signal`]s and the [`Annotations`] mapping them to values.

pub mod error;
mod signal;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use signal::Signal;

/// Values of the [`Signal`]s reported for a single trace line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotations {
    values: [Option<u64>; Signal::COUNT],
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            values: [None; Signal::COUNT],
        }
    }
}

impl Annotations {
    /// Parse the dictionary text of a trace line
    ///
    /// All `'key': value` pairs are extracted, values being hexadecimal with
    /// an optional `0x` prefix. Keys not naming a known [`Signal`] are
    /// ignored.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut res = Self::default();
        let mut rest = text;
        while let Some((key, tail)) = next_key(rest) {
            rest = tail;
            let Some(tail) = tail.trim_start().strip_prefix(':') else {
                continue;
            };
            let tail = tail.trim_start();
            let end = tail
                .find(|c: char| c.is_whitespace() || c == ',')
                .unwrap_or(tail.len());
            let (value, tail) = tail.split_at(end);
            rest = tail;
            if value.is_empty() {
                continue;
            }

            let Ok(signal) = key.parse::<Signal>() else {
                continue;
            };
            let digits = value
                .strip_prefix("0x")
                .or_else(|| value.strip_prefix("0X"))
                .unwrap_or(value);
            let value = u64::from_str_radix(digits, 16)
                .map_err(|_| Error::InvalidValue(signal, value.into()))?;
            res.set(signal, value);
        }
        Ok(res)
    }

    /// Set the value of a [`Signal`]
    pub fn set(&mut self, signal: Signal, value: u64) {
        self.values[signal as usize] = Some(value);
    }

    /// Retrieve the value of a [`Signal`], if present
    pub fn value(&self, signal: Signal) -> Option<u64> {
        self.values[signal as usize]
    }

    /// Retrieve the value of a required [`Signal`]
    pub fn get(&self, signal: Signal) -> Result<u64, Error> {
        self.value(signal).ok_or(Error::MissingSignal(signal))
    }

    /// Retrieve a required [`Signal`] as a flag
    ///
    /// Any non-zero value is considered set.
    pub fn flag(&self, signal: Signal) -> Result<bool, Error> {
        self.get(signal).map(|v| v != 0)
    }

    /// Retrieve a required [`Signal`] converted to some enumerated type
    pub fn typed<T: TryFrom<u64>>(&self, signal: Signal) -> Result<T, Error> {
        let value = self.get(signal)?;
        T::try_from(value).map_err(|_| Error::OutOfRange(signal, value))
    }

    /// Check whether no [`Signal`] is present at all
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// Find the next quoted key, returning it and the text following it
fn next_key(text: &str) -> Option<(&str, &str)> {
    let (_, tail) = text.split_once('\'')?;
    let (key, tail) = tail.split_once('\'')?;
    if key.is_empty() {
        next_key(tail)
    } else {
        Some((key, tail))
    }
}
