// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Scalar core

use crate::annotation::{self, Annotations, Signal};
use crate::config::Options;
use crate::literal::{int_lit, word_lit};
use crate::trace::Line;
use crate::types::{Size, csr::Csr, reg::Gpr};

use super::error::{Error, Inconsistency};
use super::sequencer::Offload;
use super::{Output, Policy, State, Writer};

/// Operand select value for a GPR
pub const OPER_GPR: u64 = 1;
/// Operand select value for a CSR
pub const OPER_CSR: u64 = 8;

/// Signals reported by the scalar core
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signals {
    pub stall: bool,
    pub exception: bool,
    pub fpu_offload: bool,
    pub is_seq_insn: bool,
    pub opa_select: u64,
    pub opb_select: u64,
    pub rs1: Gpr,
    pub rs2: Gpr,
    pub rd: Gpr,
    pub opa: u64,
    pub opb: u64,
    pub csr: Csr,
    pub is_load: bool,
    pub is_store: bool,
    pub is_branch: bool,
    pub ls_size: Size,
    pub alu_result: u64,
    pub gpr_rdata_1: u64,
    pub write_rd: bool,
    pub writeback: u64,
    pub retire_load: bool,
    pub lsu_rd: Gpr,
    pub ld_result_32: u64,
    pub retire_acc: bool,
    pub acc_pid: Gpr,
    pub acc_pdata_32: u64,
    pub pc_d: u64,
}

impl TryFrom<&Annotations> for Signals {
    type Error = annotation::Error;

    fn try_from(a: &Annotations) -> Result<Self, Self::Error> {
        Ok(Self {
            stall: a.flag(Signal::Stall)?,
            exception: a.flag(Signal::Exception)?,
            fpu_offload: a.flag(Signal::FpuOffload)?,
            is_seq_insn: a.flag(Signal::IsSeqInsn)?,
            opa_select: a.get(Signal::OpaSelect)?,
            opb_select: a.get(Signal::OpbSelect)?,
            rs1: a.typed(Signal::Rs1)?,
            rs2: a.typed(Signal::Rs2)?,
            rd: a.typed(Signal::Rd)?,
            opa: a.get(Signal::Opa)?,
            opb: a.get(Signal::Opb)?,
            csr: a.typed(Signal::CsrAddr)?,
            is_load: a.flag(Signal::IsLoad)?,
            is_store: a.flag(Signal::IsStore)?,
            is_branch: a.flag(Signal::IsBranch)?,
            ls_size: a.typed(Signal::LsSize)?,
            alu_result: a.get(Signal::AluResult)?,
            gpr_rdata_1: a.get(Signal::GprRdata1)?,
            write_rd: a.flag(Signal::WriteRd)?,
            writeback: a.get(Signal::Writeback)?,
            retire_load: a.flag(Signal::RetireLoad)?,
            lsu_rd: a.typed(Signal::LsuRd)?,
            ld_result_32: a.get(Signal::LdResult32)?,
            retire_acc: a.flag(Signal::RetireAcc)?,
            acc_pid: a.typed(Signal::AccPid)?,
            acc_pdata_32: a.get(Signal::AccPdata32)?,
            pc_d: a.get(Signal::PcD)?,
        })
    }
}

/// Process a line reported by the scalar core
pub fn process<P: Policy + ?Sized>(
    line: &Line,
    annotations: &Annotations,
    state: &mut State,
    options: &Options,
    policy: &mut P,
) -> Result<Output, Error> {
    let signals = Signals::try_from(annotations)?;
    let annotation = annotate(&signals, line, state, options, policy)?;

    if signals.fpu_offload {
        state.current().snitch_fseq_offloads += 1;
        let section = state.section_index();
        state.sequencer.offload(Offload {
            pc: line.pc.into(),
            section,
            is_loop: signals.is_seq_insn,
        });
    }

    if signals.stall || signals.fpu_offload {
        return Ok(Output {
            annotation,
            ..Default::default()
        });
    }
    state.current().snitch_issues += 1;
    Ok(Output {
        pc: line.pc.into(),
        insn: line.insn.into(),
        annotation,
    })
}

/// Annotate a line reported by the scalar core
///
/// Annotations are produced in datapath order: offload, exception, operands,
/// memory access or branch, writeback, retired loads and accelerator results,
/// and finally control flow.
pub fn annotate<P: Policy + ?Sized>(
    signals: &Signals,
    line: &Line,
    state: &mut State,
    options: &Options,
    policy: &mut P,
) -> Result<String, Inconsistency> {
    let s = signals;
    let ts = line.timestamp;
    let mut res = Vec::new();

    if options.annotate_offloads && s.fpu_offload {
        let target = if s.is_seq_insn { "FSEQ" } else { "FPSS" };
        match line.address() {
            Some(pc) => res.push(format!("{target} <~~ 0x{pc:08x}")),
            None => res.push(format!("{target} <~~ {}", line.pc)),
        }
    }

    if !s.stall && s.exception {
        res.push("exception".into());
    }

    if !(s.stall || s.fpu_offload) {
        if s.opa_select == OPER_GPR && !s.rs1.is_zero() {
            res.push(format!("{:<3} = {}", s.rs1, word_lit(s.opa)));
        }
        if s.opb_select == OPER_GPR && !s.rs2.is_zero() {
            res.push(format!("{:<3} = {}", s.rs2, word_lit(s.opb)));
        }
        if s.opb_select == OPER_CSR {
            if s.csr.is_mcycle() {
                state.close_segment(ts, s.opb);
            }
            res.push(format!("{} = {}", s.csr, word_lit(s.opb)));
        }

        let addr = || int_lit(s.alu_result, Size::Word, options.force_hex_addr);
        if s.is_load {
            state.current().snitch_loads += 1;
            state.gprs.push(s.rd, ts.cycle);
            res.push(format!("{:<3} <~~ {}[{}]", s.rd, s.ls_size, addr()));
        } else if s.is_store {
            state.current().snitch_stores += 1;
            res.push(format!(
                "{} ~~> {}[{}]",
                word_lit(s.gpr_rdata_1),
                s.ls_size,
                addr()
            ));
        } else if s.is_branch {
            let taken = if s.alu_result != 0 { "taken" } else { "not taken" };
            res.push(taken.into());
        }

        if s.write_rd && !s.rd.is_zero() {
            res.push(format!("(wrb) {:<3} <-- {}", s.rd, word_lit(s.writeback)));
        }
    }

    if s.retire_load && !s.lsu_rd.is_zero() {
        match state.gprs.pop(s.lsu_rd) {
            Some(issued) => {
                state.current().snitch_load_latency += ts.cycle.saturating_sub(issued);
            }
            None => policy.report(Inconsistency::WritebackUnderflow {
                cycle: ts.cycle,
                writer: Writer::Lsu,
                register: s.lsu_rd.to_string(),
            })?,
        }
        res.push(format!(
            "(lsu) {:<3} <-- {}",
            s.lsu_rd,
            word_lit(s.ld_result_32)
        ));
    }
    if s.retire_acc && !s.acc_pid.is_zero() {
        res.push(format!(
            "(acc) {:<3} <-- {}",
            s.acc_pid,
            word_lit(s.acc_pdata_32)
        ));
    }

    let linear = line.address().map(|pc| pc.wrapping_add(4));
    if !s.stall && linear.is_some_and(|pc| pc != s.pc_d) {
        res.push(format!("goto {}", word_lit(s.pc_d)));
    }

    Ok(res.join(", "))
}
