// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
use super::*;

use csr::Csr;
use reg::{Fpr, Gpr, Register};

#[test]
fn privilege_letters() {
    assert_eq!(Privilege::try_from(3).map(|p| p.to_string()), Ok("M".into()));
    assert_eq!(Privilege::try_from(1).map(|p| p.to_string()), Ok("S".into()));
    assert_eq!(Privilege::try_from(0).map(|p| p.to_string()), Ok("U".into()));
    assert_eq!(Privilege::try_from(2), Err(2));
}

#[test]
fn sizes() {
    assert_eq!(Size::Byte.mask(), 0xff);
    assert_eq!(Size::Word.mask(), 0xffff_ffff);
    assert_eq!(Size::Double.mask(), u64::MAX);
    assert_eq!(Size::try_from(3), Ok(Size::Double));
    assert_eq!(Size::try_from(4), Err(4));
    assert_eq!(Size::Double.to_string(), "Doub");
}

#[test]
fn register_names() {
    assert_eq!(Gpr::try_from(0).map(|r| r.to_string()), Ok("zero".into()));
    assert_eq!(Gpr::try_from(10).map(|r| r.to_string()), Ok("a0".into()));
    assert_eq!(Gpr::try_from(31).map(|r| r.to_string()), Ok("t6".into()));
    assert_eq!(Fpr::try_from(8).map(|r| r.to_string()), Ok("fs0".into()));
    assert_eq!(Fpr::try_from(31).map(|r| r.to_string()), Ok("ft11".into()));
    assert_eq!(Fpr::try_from(32), Err(32));
    assert_eq!(Gpr::from_index(5).index(), 5);
}

#[test]
fn register_padding() {
    let reg = Gpr::try_from(1).unwrap();
    assert_eq!(format!("{reg:<3}|"), "ra |");
}

#[test]
fn csr_names() {
    assert_eq!(Csr(0xb00).to_string(), "mcycle");
    assert!(Csr(0xb00).is_mcycle());
    assert_eq!(Csr(0xc03).to_string(), "hpmcounter3");
    assert_eq!(Csr(0xc9f).to_string(), "hpmcounter31h");
    assert_eq!(Csr(0xb1e).to_string(), "mhpmcounter30");
    assert_eq!(Csr(0x33f).to_string(), "mhpmevent31");
    assert_eq!(Csr(0x3bf).to_string(), "pmpaddr15");
    assert_eq!(Csr(0xf14).to_string(), "mhartid");
    assert_eq!(Csr(0x7c0).to_string(), "csr@7c0");
}
