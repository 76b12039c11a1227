// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Floating point formats

use core::fmt;

use crate::types::Size;

/// Default number of characters targeted by [`format`]
pub const DEFAULT_WIDTH: usize = 7;

/// Floating point format supported by the FP subsystem
///
/// The discriminant matches the format index used in trace signals.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub enum Format {
    /// IEEE binary32
    #[default]
    Fp32,
    /// IEEE binary64
    Fp64,
    /// IEEE binary16
    Fp16,
    /// 8 bit minifloat with 5 exponent bits
    Fp8,
    /// Alternative 16 bit format (bfloat16)
    Fp16Alt,
}

impl Format {
    /// Width of the exponent field in bits
    pub const fn exponent_width(self) -> u32 {
        match self {
            Self::Fp32 => 8,
            Self::Fp64 => 11,
            Self::Fp16 => 5,
            Self::Fp8 => 5,
            Self::Fp16Alt => 8,
        }
    }

    /// Width of the mantissa field in bits
    pub const fn mantissa_width(self) -> u32 {
        match self {
            Self::Fp32 => 23,
            Self::Fp64 => 52,
            Self::Fp16 => 10,
            Self::Fp8 => 2,
            Self::Fp16Alt => 7,
        }
    }

    /// Total width in bits
    pub const fn width(self) -> u32 {
        1 + self.exponent_width() + self.mantissa_width()
    }

    /// Exponent bias, as a negative number
    pub const fn bias(self) -> i32 {
        -((1 << (self.exponent_width() - 1)) - 1)
    }

    /// Format used for memory transfers of the given [`Size`]
    ///
    /// Half-word transfers are always treated as IEEE binary16, even if the
    /// value is actually in [`Format::Fp16Alt`]. The trace carries no
    /// information to tell them apart.
    pub const fn from_transfer(size: Size) -> Self {
        match size {
            Size::Byte => Self::Fp8,
            Size::Half => Self::Fp16,
            Size::Word => Self::Fp32,
            Size::Double => Self::Fp64,
        }
    }
}

impl TryFrom<u64> for Format {
    type Error = u64;

    fn try_from(num: u64) -> Result<Self, Self::Error> {
        match num {
            0 => Ok(Self::Fp32),
            1 => Ok(Self::Fp64),
            2 => Ok(Self::Fp16),
            3 => Ok(Self::Fp8),
            4 => Ok(Self::Fp16Alt),
            err => Err(err),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fp32 => write!(f, "fp32"),
            Self::Fp64 => write!(f, "fp64"),
            Self::Fp16 => write!(f, "fp16"),
            Self::Fp8 => write!(f, "fp8"),
            Self::Fp16Alt => write!(f, "fp16alt"),
        }
    }
}

/// Decode the value encoded in the lower bits of `bits` in the given [`Format`]
pub fn decode(bits: u64, format: Format) -> f64 {
    let exp_width = format.exponent_width();
    let mnt_width = format.mantissa_width();

    let mnt = bits & ((1 << mnt_width) - 1);
    let exp = (bits >> mnt_width) & ((1 << exp_width) - 1);
    let sign = if (bits >> (exp_width + mnt_width)) & 1 != 0 {
        -1.0
    } else {
        1.0
    };

    let exp_max = (1 << exp_width) - 1;
    let bias = format.bias();
    if exp == exp_max {
        if mnt == 0 {
            sign * f64::INFINITY
        } else {
            f64::NAN
        }
    } else if exp == 0 && mnt == 0 {
        sign * 0.0
    } else if exp == 0 {
        sign * (mnt as f64) * exp2(bias + 1 - mnt_width as i32)
    } else {
        let significand = mnt | (1 << mnt_width);
        sign * (significand as f64) * exp2(exp as i32 + bias - mnt_width as i32)
    }
}

/// Decode and [`format`] a floating point literal
pub fn lit(bits: u64, format: Format, width: usize) -> String {
    self::format(decode(bits, format), width)
}

/// Render a floating point value, targeting the given `width`
///
/// The shortest decimal rendering is used if it is short enough. Otherwise,
/// the value is rendered with a fixed number of decimals if its binary
/// exponent lies in `0..=width`, or in scientific notation.
pub fn format(value: f64, width: usize) -> String {
    let default = format!("{value:?}");
    if default.len().saturating_sub(1) <= width {
        return default;
    }

    let width = width as i32;
    match frexp(value) {
        Some((_, exp)) if -1 < exp && exp <= width => {
            let prec = (width - exp) as usize;
            format!("{value:.prec$}")
        }
        _ => {
            let prec = width.saturating_sub(3).max(0) as usize;
            format!("{value:.prec$e}")
        }
    }
}

/// Split a finite value into a mantissa in `[0.5, 1)` and a binary exponent
///
/// The mantissa carries the sign of the `value`. Returns `None` for infinite
/// values and NaN.
pub fn frexp(value: f64) -> Option<(f64, i32)> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some((value, 0));
    }

    let bits = value.to_bits();
    let raw_exp = ((bits >> 52) & 0x7ff) as i32;
    if raw_exp == 0 {
        // Subnormal: normalize first
        let (mnt, exp) = frexp(value * exp2(64))?;
        return Some((mnt, exp - 64));
    }

    let mnt = f64::from_bits((bits & !(0x7ff << 52)) | (1022 << 52));
    Some((mnt, raw_exp - 1022))
}

/// Compute `2^exp` exactly for the whole range of [`f64`]
fn exp2(exp: i32) -> f64 {
    if exp > 1023 {
        f64::INFINITY
    } else if exp >= -1022 {
        f64::from_bits(((exp + 1023) as u64) << 52)
    } else if exp >= -1074 {
        f64::from_bits(1 << (exp + 1074))
    } else {
        0.0
    }
}
