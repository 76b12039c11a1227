// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Architectural types shared by the [trace][crate::trace] parser and the
//! [engine][crate::engine]

pub mod csr;
pub mod reg;

#[cfg(test)]
mod tests;

use core::fmt;

/// RISC-V priviledge levels
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub enum Privilege {
    #[default]
    User,
    Supervisor,
    Machine,
}

impl TryFrom<u8> for Privilege {
    type Error = u8;

    fn try_from(num: u8) -> Result<Self, Self::Error> {
        match num {
            0b00 => Ok(Self::User),
            0b01 => Ok(Self::Supervisor),
            0b11 => Ok(Self::Machine),
            err => Err(err),
        }
    }
}

impl From<Privilege> for u8 {
    fn from(p: Privilege) -> Self {
        match p {
            Privilege::User => 0b00,
            Privilege::Supervisor => 0b01,
            Privilege::Machine => 0b11,
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privilege::User => write!(f, "U"),
            Privilege::Supervisor => write!(f, "S"),
            Privilege::Machine => write!(f, "M"),
        }
    }
}

/// Size of a memory transfer or of an integer literal
///
/// The discriminant is the binary logarithm of the size in bytes, which is
/// also how the trace signals encode it.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub enum Size {
    Byte,
    Half,
    #[default]
    Word,
    Double,
}

impl Size {
    /// Width in bits
    pub const fn bits(self) -> u32 {
        8 << (self as u32)
    }

    /// Bit mask covering a value of this size
    pub const fn mask(self) -> u64 {
        u64::MAX >> (64 - self.bits())
    }
}

impl TryFrom<u64> for Size {
    type Error = u64;

    fn try_from(num: u64) -> Result<Self, Self::Error> {
        match num {
            0 => Ok(Self::Byte),
            1 => Ok(Self::Half),
            2 => Ok(Self::Word),
            3 => Ok(Self::Double),
            err => Err(err),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Size::Byte => write!(f, "Byte"),
            Size::Half => write!(f, "Half"),
            Size::Word => write!(f, "Word"),
            Size::Double => write!(f, "Doub"),
        }
    }
}
