// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Configuration and utilities

#[cfg(feature = "serde")]
pub mod serde_utils;

/// Engine options
///
/// Options control how the [engine][crate::engine::Engine] renders annotations
/// and how it reacts to inconsistencies. With the `serde` feature, options may
/// be deserialized, e.g. from a TOML file. Missing fields take their
/// [`Default`] values.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Options {
    /// Annotate offloads to the FP subsystem and sequencer on the core's line
    #[cfg_attr(feature = "serde", serde(with = "serde_utils::Flag"))]
    pub annotate_offloads: bool,
    /// Render load and store addresses as hex even if they are small
    #[cfg_attr(feature = "serde", serde(with = "serde_utils::Flag"))]
    pub force_hex_addr: bool,
    /// Include counters that only serve to compute other metrics in reports
    #[cfg_attr(feature = "serde", serde(with = "serde_utils::Flag"))]
    pub all_keys: bool,
    /// Report inconsistencies as warnings rather than failing
    #[cfg_attr(feature = "serde", serde(with = "serde_utils::Flag"))]
    pub permissive: bool,
    /// Show the timestamp on every line, even if it did not change
    #[cfg_attr(feature = "serde", serde(with = "serde_utils::Flag"))]
    pub repeat_timestamps: bool,
}

/// See [OPTIONS] for default values of individual fields
impl Default for Options {
    fn default() -> Self {
        OPTIONS
    }
}

/// Default [Options]
pub const OPTIONS: Options = Options {
    annotate_offloads: false,
    force_hex_addr: true,
    all_keys: false,
    permissive: false,
    repeat_timestamps: false,
};

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn from_toml() {
        let options: Options = toml::from_str("permissive = true\nforce_hex_addr = 0\n")
            .expect("Could not parse options");
        assert_eq!(
            options,
            Options {
                permissive: true,
                force_hex_addr: false,
                ..OPTIONS
            }
        );
    }

    #[test]
    fn empty_toml() {
        let options: Options = toml::from_str("").expect("Could not parse options");
        assert_eq!(options, OPTIONS);
    }

    #[test]
    fn invalid_flag() {
        assert!(toml::from_str::<Options>("permissive = 2").is_err());
        assert!(toml::from_str::<Options>("permissve = true").is_err());
    }
}
