// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
use super::*;

use crate::types::{Size, reg::Gpr};

#[test]
fn parse_dict() {
    let annotations = Annotations::parse("'source': 0x2, 'cbuf_push': 0x1, 'max_rpt': 0xa")
        .expect("Could not parse annotations");
    assert_eq!(annotations.value(Signal::Source), Some(2));
    assert_eq!(annotations.flag(Signal::CbufPush), Ok(true));
    assert_eq!(annotations.get(Signal::MaxRpt), Ok(10));
    assert_eq!(annotations.value(Signal::MaxInst), None);
}

#[test]
fn parse_without_prefix_and_spacing() {
    let annotations =
        Annotations::parse("'rd':1f,'stall' :  0").expect("Could not parse annotations");
    assert_eq!(annotations.get(Signal::Rd), Ok(0x1f));
    assert_eq!(annotations.flag(Signal::Stall), Ok(false));
}

#[test]
fn unknown_keys_ignored() {
    let annotations = Annotations::parse("'frobnicate': 0x5, 'source': 0x0")
        .expect("Could not parse annotations");
    assert_eq!(annotations.get(Signal::Source), Ok(0));
    assert!(!annotations.is_empty());
}

#[test]
fn empty_dict() {
    let annotations = Annotations::parse("").expect("Could not parse annotations");
    assert!(annotations.is_empty());
    assert_eq!(
        annotations.get(Signal::Source),
        Err(Error::MissingSignal(Signal::Source))
    );
}

#[test]
fn invalid_value() {
    assert_eq!(
        Annotations::parse("'source': 0xzz"),
        Err(Error::InvalidValue(Signal::Source, "0xzz".into()))
    );
}

#[test]
fn typed_values() {
    let annotations =
        Annotations::parse("'ls_size': 0x3, 'rd': 0x21").expect("Could not parse annotations");
    assert_eq!(annotations.typed::<Size>(Signal::LsSize), Ok(Size::Double));
    assert_eq!(
        annotations.typed::<Gpr>(Signal::Rd),
        Err(Error::OutOfRange(Signal::Rd, 0x21))
    );
}

#[test]
fn signal_names() {
    assert_eq!("op_sel_2".parse(), Ok(Signal::OpSel2));
    assert_eq!(Signal::GprRdata1.name(), "gpr_rdata_1");
    assert_eq!("nonexistent".parse::<Signal>(), Err(()));
}
