// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Builders for annotated trace lines

use core::fmt;

use crate::annotation::Signal;

/// Signals reported by the core, with values of an idle core
const SNITCH: &[(Signal, u64)] = &[
    (Signal::Stall, 0),
    (Signal::Exception, 0),
    (Signal::FpuOffload, 0),
    (Signal::IsSeqInsn, 0),
    (Signal::OpaSelect, 0),
    (Signal::OpbSelect, 0),
    (Signal::Rs1, 0),
    (Signal::Rs2, 0),
    (Signal::Rd, 0),
    (Signal::Opa, 0),
    (Signal::Opb, 0),
    (Signal::CsrAddr, 0),
    (Signal::IsLoad, 0),
    (Signal::IsStore, 0),
    (Signal::IsBranch, 0),
    (Signal::LsSize, 2),
    (Signal::AluResult, 0),
    (Signal::GprRdata1, 0),
    (Signal::WriteRd, 0),
    (Signal::Writeback, 0),
    (Signal::RetireLoad, 0),
    (Signal::LsuRd, 0),
    (Signal::LdResult32, 0),
    (Signal::RetireAcc, 0),
    (Signal::AccPid, 0),
    (Signal::AccPdata32, 0),
];

/// Signals reported by the FP subsystem, with values of an idle subsystem
const FPU: &[(Signal, u64)] = &[
    (Signal::AccQHs, 0),
    (Signal::UseFpu, 0),
    (Signal::FpuInAcc, 0),
    (Signal::FpuInRd, 0),
    (Signal::DstFmt, 0),
    (Signal::SrcFmt, 0),
    (Signal::IntFmt, 2),
    (Signal::IsLoad, 0),
    (Signal::IsStore, 0),
    (Signal::LsSize, 2),
    (Signal::Rs1, 0),
    (Signal::Rs2, 0),
    (Signal::Rs3, 0),
    (Signal::Rd, 0),
    (Signal::OpSel0, 0),
    (Signal::OpSel1, 0),
    (Signal::OpSel2, 0),
    (Signal::Op0, 0),
    (Signal::Op1, 0),
    (Signal::Op2, 0),
    (Signal::AccQdata0, 0),
    (Signal::AccQdata1, 0),
    (Signal::AccQdata2, 0),
    (Signal::LsuQHs, 0),
    (Signal::LsuQaddr, 0),
    (Signal::FpuOutHs, 0),
    (Signal::FpuOutAcc, 0),
    (Signal::FprWe, 0),
    (Signal::FprWaddr, 0),
    (Signal::FprWdata, 0),
    (Signal::AccWbReady, 0),
];

/// An annotated trace line under construction
#[derive(Clone, Debug)]
pub struct Builder {
    time: u64,
    cycle: u64,
    pc: String,
    insn: String,
    signals: Vec<(Signal, u64)>,
}

impl Builder {
    fn new(cycle: u64, pc: String, source: u64, signals: &[(Signal, u64)]) -> Self {
        let mut res = Self {
            time: cycle * 1000,
            cycle,
            pc,
            insn: Default::default(),
            signals: vec![(Signal::Source, source)],
        };
        res.signals.extend_from_slice(signals);
        res
    }

    /// Set the simulation time
    pub fn time(self, time: u64) -> Self {
        Self { time, ..self }
    }

    /// Set the disassembled instruction
    pub fn insn(self, insn: &str) -> Self {
        Self {
            insn: insn.into(),
            ..self
        }
    }

    /// Set a signal
    pub fn set(mut self, signal: Signal, value: u64) -> Self {
        match self.signals.iter_mut().find(|(s, _)| *s == signal) {
            Some((_, v)) => *v = value,
            None => self.signals.push((signal, value)),
        }
        self
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} 3 {} {} #;", self.time, self.cycle, self.pc, self.insn)?;
        let mut sep = " ";
        for (signal, value) in &self.signals {
            write!(f, "{sep}'{signal}': 0x{value:x}")?;
            sep = ", ";
        }
        Ok(())
    }
}

/// A line reported by the core executing the instruction at `pc`
pub fn snitch(cycle: u64, pc: u64) -> Builder {
    Builder::new(cycle, format!("0x{pc:08x}"), 0, SNITCH).set(Signal::PcD, pc + 4)
}

/// A line reported by the FP subsystem
pub fn fpu(cycle: u64) -> Builder {
    Builder::new(cycle, "0xzzzzzzzz".into(), 1, FPU)
}

/// A line reported by the sequencer
pub fn sequencer(cycle: u64) -> Builder {
    Builder::new(cycle, "0xzzzzzzzz".into(), 2, &[(Signal::CbufPush, 0)])
}

/// A vanilla line without annotations
pub fn vanilla(cycle: u64, pc: u64, insn: &str) -> String {
    format!("{} {cycle} 3 0x{pc:08x} {insn}", cycle * 1000)
}

/// A read of `mcycle` into `a0` by the core
pub fn mcycle(cycle: u64, pc: u64, value: u64) -> Builder {
    snitch(cycle, pc)
        .insn("csrr a0, mcycle")
        .set(Signal::OpbSelect, 8)
        .set(Signal::CsrAddr, 0xb00)
        .set(Signal::Opb, value)
        .set(Signal::Rd, 10)
        .set(Signal::WriteRd, 1)
        .set(Signal::Writeback, value)
}

/// An offload of the instruction at `pc` by the core
pub fn offload(cycle: u64, pc: u64, is_loop: bool) -> Builder {
    snitch(cycle, pc)
        .insn(if is_loop { "frep.o t0, 4" } else { "fadd.d ft2, ft0, ft1" })
        .set(Signal::FpuOffload, 1)
        .set(Signal::IsSeqInsn, is_loop.into())
}

/// A loop configuration pushed by the sequencer
pub fn frep(cycle: u64, max_rpt: u64, max_inst: u64, is_outer: bool) -> Builder {
    sequencer(cycle)
        .set(Signal::CbufPush, 1)
        .set(Signal::MaxRpt, max_rpt)
        .set(Signal::MaxInst, max_inst)
        .set(Signal::StgMask, 0)
        .set(Signal::StgMax, 0)
        .set(Signal::IsOuter, is_outer.into())
}

/// An instruction issue by the FP subsystem
pub fn issue(cycle: u64) -> Builder {
    fpu(cycle)
        .insn("fadd.d ft2, ft0, ft1")
        .set(Signal::AccQHs, 1)
}
