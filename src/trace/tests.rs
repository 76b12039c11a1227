// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
use super::*;

#[test]
fn vanilla_line() {
    let line = Line::parse("  1000  1  3  0x80000000  addi a0, a0, 1   \n")
        .expect("Could not parse line");
    assert_eq!(
        line.timestamp,
        Timestamp {
            time: 1000,
            cycle: 1
        }
    );
    assert_eq!(line.privilege, Privilege::Machine);
    assert_eq!(line.pc, "0x80000000");
    assert_eq!(line.address(), Some(0x8000_0000));
    assert_eq!(line.insn, "addi a0, a0, 1");
    assert_eq!(line.annotations, None);
}

#[test]
fn annotated_line() {
    let line = Line::parse("5000 5 0 0x00001000 lw a0, 0(a1) #; 'source': 0x0, 'stall': 0x1")
        .expect("Could not parse line");
    assert_eq!(line.privilege, Privilege::User);
    assert_eq!(line.insn, "lw a0, 0(a1)");
    assert_eq!(line.annotations, Some("'source': 0x0, 'stall': 0x1"));
}

#[test]
fn blank_annotations() {
    let line = Line::parse("5000 5 1 0x00001000 nop #;   ").expect("Could not parse line");
    assert_eq!(line.privilege, Privilege::Supervisor);
    assert_eq!(line.annotations, None);
}

#[test]
fn undefined_pc() {
    let line = Line::parse("5000 5 3 0xzzzzzzzz #; 'source': 0x1").expect("Could not parse line");
    assert_eq!(line.pc, "0xzzzzzzzz");
    assert_eq!(line.address(), None);
    assert_eq!(line.insn, "");
}

#[test]
fn malformed_lines() {
    assert!(matches!(
        Line::parse("garbage"),
        Err(Error::Malformed(_))
    ));
    assert!(matches!(
        Line::parse("1000 1 3 80000000 nop"),
        Err(Error::Malformed(_))
    ));
    assert!(matches!(
        Line::parse("1000 x 3 0x80000000 nop"),
        Err(Error::Malformed(_))
    ));
    assert_eq!(
        Line::parse("1000 1 2 0x80000000 nop"),
        Err(Error::UnknownPrivilege(2))
    );
}

#[test]
fn output_columns() {
    let line = Annotated {
        timestamp: Some(Timestamp {
            time: 1000,
            cycle: 1,
        }),
        privilege: Privilege::Machine,
        pc: "0x80000000".into(),
        insn: "addi a0, a0, 1".into(),
        annotation: Some("a0  = 1".into()),
    };
    assert_eq!(
        line.to_string(),
        "    1000        1        M 0x80000000 addi a0, a0, 1                 #; a0  = 1"
    );

    let line = Annotated {
        timestamp: None,
        annotation: None,
        ..line
    };
    assert_eq!(
        line.to_string(),
        "                         M 0x80000000 addi a0, a0, 1                "
    );
}
