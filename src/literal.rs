// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Rendering of integer and floating point literals
//!
//! Short integer literals read better as signed decimals while addresses and
//! large values read better as hex. [`int_lit`] picks a representation
//! accordingly. Floating point values are decoded and rendered via [`float`].

pub mod float;


use crate::types::Size;

/// Largest absolute value rendered as a signed decimal
pub const MAX_SIGNED_INT_LIT: i64 = 0xFFFF;

/// Render an integer literal
///
/// The `num` is masked to the given [`Size`] and reinterpreted as a signed
/// value. Values up to [`Size::Word`] are reinterpreted via their lower 32
/// bits, [`Size::Double`] values via all 64 bits. The signed decimal is
/// returned unless `force_hex` is set or its absolute value exceeds
/// [`MAX_SIGNED_INT_LIT`], in which case the masked value is rendered as
/// zero-padded hex covering the full size.
pub fn int_lit(num: u64, size: Size, force_hex: bool) -> String {
    let num = num & size.mask();
    let signed = if size == Size::Double {
        num as i64
    } else {
        i64::from(num as u32 as i32)
    };

    if force_hex || signed.unsigned_abs() > MAX_SIGNED_INT_LIT as u64 {
        let digits = (size.bits() / 4) as usize;
        format!("0x{num:0digits$x}")
    } else {
        signed.to_string()
    }
}

/// Render an integer literal of [`Size::Word`] in its preferred form
pub fn word_lit(num: u64) -> String {
    int_lit(num, Size::Word, false)
}
