// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Register files

use core::fmt;

/// Number of registers in each register file
pub const COUNT: usize = 32;

const GPR_NAMES: [&str; COUNT] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

const FPR_NAMES: [&str; COUNT] = [
    "ft0", "ft1", "ft2", "ft3", "ft4", "ft5", "ft6", "ft7", "fs0", "fs1", "fa0", "fa1", "fa2",
    "fa3", "fa4", "fa5", "fa6", "fa7", "fs2", "fs3", "fs4", "fs5", "fs6", "fs7", "fs8", "fs9",
    "fs10", "fs11", "ft8", "ft9", "ft10", "ft11",
];

/// A register in one of the register files
///
/// Registers are identified by their index. Their [`Display`][fmt::Display]
/// impl yields the ABI name.
pub trait Register: Copy + fmt::Display + TryFrom<u64, Error = u64> {
    /// Retrieve the register's index
    fn index(self) -> usize;

    /// Create a register from an index known to be in range
    fn from_index(index: usize) -> Self;
}

macro_rules! register_file {
    ($name:ident, $names:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
        pub struct $name(u8);

        impl $name {
            /// Check whether this is register zero
            pub fn is_zero(self) -> bool {
                self.0 == 0
            }
        }

        impl Register for $name {
            fn index(self) -> usize {
                self.0.into()
            }

            fn from_index(index: usize) -> Self {
                Self((index % COUNT) as u8)
            }
        }

        impl TryFrom<u64> for $name {
            type Error = u64;

            fn try_from(num: u64) -> Result<Self, Self::Error> {
                u8::try_from(num)
                    .ok()
                    .filter(|n| usize::from(*n) < COUNT)
                    .map(Self)
                    .ok_or(num)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad($names[usize::from(self.0)])
            }
        }
    };
}

register_file!(Gpr, GPR_NAMES, "General purpose (integer) register");
register_file!(Fpr, FPR_NAMES, "Floating point register");
