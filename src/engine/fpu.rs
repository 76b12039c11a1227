// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Floating point subsystem

use crate::annotation::{self, Annotations, Signal};
use crate::config::Options;
use crate::literal::float::{self, DEFAULT_WIDTH, Format};
use crate::literal::int_lit;
use crate::trace::Line;
use crate::types::{Size, reg::Fpr};

use super::error::{Error, Inconsistency};
use super::{Output, Policy, State, Writer};

/// Source of an FPU operand
///
/// The numbering mirrors the operand selection enumeration of the FP
/// subsystem's RTL. It is not part of any stable interface and may shift
/// between hardware revisions.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Operand {
    #[default]
    None,
    /// Data supplied by the core via the accelerator interface
    Acc,
    Rs1,
    Rs2,
    Rs3,
    Rd,
}

impl TryFrom<u64> for Operand {
    type Error = u64;

    fn try_from(num: u64) -> Result<Self, Self::Error> {
        match num {
            0 => Ok(Self::None),
            1 => Ok(Self::Acc),
            2 | 5 => Ok(Self::Rs1),
            3 => Ok(Self::Rs2),
            4 => Ok(Self::Rs3),
            6 => Ok(Self::Rd),
            err => Err(err),
        }
    }
}

/// Signals reported by the FP subsystem
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signals {
    pub acc_q_hs: bool,
    pub use_fpu: bool,
    pub fpu_in_acc: bool,
    pub fpu_in_rd: Fpr,
    pub dst_fmt: Format,
    pub src_fmt: Format,
    pub int_fmt: Size,
    pub is_load: bool,
    pub is_store: bool,
    pub ls_size: Size,
    pub rs1: Fpr,
    pub rs2: Fpr,
    pub rs3: Fpr,
    pub rd: Fpr,
    /// Operand selection for each port
    pub op_sel: [Operand; 3],
    /// Operand value for each port
    pub op: [u64; 3],
    /// Accelerator data for each port
    pub acc_qdata: [u64; 3],
    pub lsu_q_hs: bool,
    pub lsu_qaddr: u64,
    pub fpu_out_hs: bool,
    pub fpu_out_acc: bool,
    pub fpr_we: bool,
    pub fpr_waddr: Fpr,
    pub fpr_wdata: u64,
    pub acc_wb_ready: bool,
}

impl TryFrom<&Annotations> for Signals {
    type Error = annotation::Error;

    fn try_from(a: &Annotations) -> Result<Self, Self::Error> {
        Ok(Self {
            acc_q_hs: a.flag(Signal::AccQHs)?,
            use_fpu: a.flag(Signal::UseFpu)?,
            fpu_in_acc: a.flag(Signal::FpuInAcc)?,
            fpu_in_rd: a.typed(Signal::FpuInRd)?,
            dst_fmt: a.typed(Signal::DstFmt)?,
            src_fmt: a.typed(Signal::SrcFmt)?,
            int_fmt: a.typed(Signal::IntFmt)?,
            is_load: a.flag(Signal::IsLoad)?,
            is_store: a.flag(Signal::IsStore)?,
            ls_size: a.typed(Signal::LsSize)?,
            rs1: a.typed(Signal::Rs1)?,
            rs2: a.typed(Signal::Rs2)?,
            rs3: a.typed(Signal::Rs3)?,
            rd: a.typed(Signal::Rd)?,
            op_sel: [
                a.typed(Signal::OpSel0)?,
                a.typed(Signal::OpSel1)?,
                a.typed(Signal::OpSel2)?,
            ],
            op: [
                a.get(Signal::Op0)?,
                a.get(Signal::Op1)?,
                a.get(Signal::Op2)?,
            ],
            acc_qdata: [
                a.get(Signal::AccQdata0)?,
                a.get(Signal::AccQdata1)?,
                a.get(Signal::AccQdata2)?,
            ],
            lsu_q_hs: a.flag(Signal::LsuQHs)?,
            lsu_qaddr: a.get(Signal::LsuQaddr)?,
            fpu_out_hs: a.flag(Signal::FpuOutHs)?,
            fpu_out_acc: a.flag(Signal::FpuOutAcc)?,
            fpr_we: a.flag(Signal::FprWe)?,
            fpr_waddr: a.typed(Signal::FprWaddr)?,
            fpr_wdata: a.get(Signal::FprWdata)?,
            acc_wb_ready: a.flag(Signal::AccWbReady)?,
        })
    }
}

impl Signals {
    /// Retrieve name and rendered value of an operand port
    ///
    /// Returns `None` if the port is unused.
    pub fn operand(&self, port: usize) -> Option<(String, String)> {
        let register = match self.op_sel.get(port)? {
            Operand::None => return None,
            Operand::Acc => {
                let value = int_lit(self.acc_qdata[port], self.int_fmt, false);
                return Some((format!("ac{}", port + 1), value));
            }
            Operand::Rs1 => self.rs1,
            Operand::Rs2 => self.rs2,
            Operand::Rs3 => self.rs3,
            Operand::Rd => self.rd,
        };
        let format = if self.is_store {
            Format::from_transfer(self.ls_size)
        } else {
            self.src_fmt
        };
        let value = float::lit(self.op[port], format, DEFAULT_WIDTH);
        Some((register.to_string(), value))
    }

    /// Determine the unit writing back to the register file
    pub fn writer(&self) -> Writer {
        if self.acc_q_hs && self.acc_wb_ready {
            Writer::Acc
        } else if self.fpu_out_hs && !self.fpu_out_acc {
            Writer::Fpu
        } else {
            Writer::Lsu
        }
    }
}

/// Process a line reported by the FP subsystem
///
/// On an instruction issue, the sequencer is emulated to recover the issued
/// instruction's PC and performance section.
pub fn process<P: Policy + ?Sized>(
    line: &Line,
    annotations: &Annotations,
    state: &mut State,
    options: &Options,
    policy: &mut P,
) -> Result<Output, Error> {
    let signals = Signals::try_from(annotations)?;
    let cycle = line.timestamp.cycle;
    let mut res = Output::default();
    let mut parts = Vec::new();

    if signals.acc_q_hs {
        let issue = state.sequencer.emulate(cycle, policy)?;
        if let Some(section) = issue.section {
            state.section = section;
        }
        let segment = state.segment(state.section);
        segment.end_fpss = cycle;
        segment.fpss_issues += 1;

        if let Some((rpt, idx)) = issue.coords {
            let header = issue.header.as_deref().unwrap_or_default();
            parts.push(format!("[{} {rpt}:{idx}]", tail(header, 4)));
        }
        res.pc = issue.pc.unwrap_or_default();
        res.insn = line.insn.into();
    }

    let annotation = annotate(&signals, cycle, state, options, policy)?;
    if !annotation.is_empty() {
        parts.push(annotation);
    }
    res.annotation = parts.join(", ");
    Ok(res)
}

/// Annotate a line reported by the FP subsystem
///
/// Loads, stores and latencies are accounted to the performance section of
/// the last issued instruction. FPU issues are accounted to the current
/// section.
pub fn annotate<P: Policy + ?Sized>(
    signals: &Signals,
    cycle: u64,
    state: &mut State,
    options: &Options,
    policy: &mut P,
) -> Result<String, Inconsistency> {
    let s = signals;
    let section = state.section;
    let mut res = Vec::new();

    if s.acc_q_hs {
        if s.use_fpu && !s.fpu_in_acc {
            state.fprs.push(s.fpu_in_rd, (s.dst_fmt, cycle));
        }

        if !s.is_store {
            res.extend(
                (0..3)
                    .filter_map(|port| s.operand(port))
                    .map(|(name, value)| format!("{name:<4} = {value}")),
            );
        }

        if s.lsu_q_hs {
            let addr = int_lit(s.lsu_qaddr, Size::Word, options.force_hex_addr);
            if s.is_load {
                state.segment(section).fpss_loads += 1;
                let format = Format::from_transfer(s.ls_size);
                state.fprs.push(s.rd, (format, cycle));
                res.push(format!("{:<4} <~~ {}[{addr}]", s.rd, s.ls_size));
            }
            if s.is_store {
                state.segment(section).fpss_stores += 1;
                let value = s.operand(1).map(|(_, v)| v);
                let value = value.as_deref().unwrap_or("None");
                res.push(format!("{value} ~~> {}[{addr}]", s.ls_size));
            }
        }
    }

    if s.fpu_out_hs {
        state.current().fpss_fpu_issues += 1;
    }

    if s.fpr_we {
        let writer = s.writer();
        let mut format = Format::Fp32;
        if writer != Writer::Acc {
            match state.fprs.pop(s.fpr_waddr) {
                Some((issued_format, issued)) => {
                    format = issued_format;
                    let latency = cycle.saturating_sub(issued);
                    let segment = state.segment(section);
                    if writer == Writer::Lsu {
                        segment.fpss_load_latency += latency;
                    } else {
                        segment.fpss_fpu_latency += latency;
                    }
                }
                None => policy.report(Inconsistency::WritebackUnderflow {
                    cycle,
                    writer,
                    register: s.fpr_waddr.to_string(),
                })?,
            }
        }
        res.push(format!(
            "(f:{writer}) {:<4} <-- {}",
            s.fpr_waddr,
            float::lit(s.fpr_wdata, format, DEFAULT_WIDTH)
        ));
    }

    Ok(res.join(", "))
}

/// Retrieve the last `n` characters of a string
fn tail(s: &str, n: usize) -> &str {
    s.char_indices()
        .rev()
        .nth(n.saturating_sub(1))
        .map(|(i, _)| &s[i..])
        .unwrap_or(s)
}
