// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Known side-channel signals

use core::fmt;
use core::str::FromStr;

macro_rules! signals {
    ($($v:ident => $n:literal),* $(,)?) => {
        /// Microarchitectural signal reported in a trace line's annotations
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum Signal {
            $($v,)*
        }

        impl Signal {
            /// Number of known signals
            pub const COUNT: usize = [$(Signal::$v),*].len();

            /// Retrieve the name of the signal as it appears in traces
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$v => $n,)*
                }
            }
        }

        impl FromStr for Signal {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($n => Ok(Self::$v),)*
                    _ => Err(()),
                }
            }
        }
    };
}

signals! {
    // Common
    Source => "source",
    // Shared by core and FP subsystem
    Rs1 => "rs1",
    Rs2 => "rs2",
    Rd => "rd",
    IsLoad => "is_load",
    IsStore => "is_store",
    LsSize => "ls_size",
    // Core
    Stall => "stall",
    Exception => "exception",
    FpuOffload => "fpu_offload",
    IsSeqInsn => "is_seq_insn",
    OpaSelect => "opa_select",
    OpbSelect => "opb_select",
    Opa => "opa",
    Opb => "opb",
    CsrAddr => "csr_addr",
    IsBranch => "is_branch",
    AluResult => "alu_result",
    GprRdata1 => "gpr_rdata_1",
    WriteRd => "write_rd",
    Writeback => "writeback",
    RetireLoad => "retire_load",
    LsuRd => "lsu_rd",
    LdResult32 => "ld_result_32",
    RetireAcc => "retire_acc",
    AccPid => "acc_pid",
    AccPdata32 => "acc_pdata_32",
    PcD => "pc_d",
    // Sequencer
    CbufPush => "cbuf_push",
    MaxInst => "max_inst",
    MaxRpt => "max_rpt",
    StgMask => "stg_mask",
    StgMax => "stg_max",
    IsOuter => "is_outer",
    // FP subsystem
    AccQHs => "acc_q_hs",
    UseFpu => "use_fpu",
    FpuInAcc => "fpu_in_acc",
    FpuInRd => "fpu_in_rd",
    DstFmt => "dst_fmt",
    SrcFmt => "src_fmt",
    IntFmt => "int_fmt",
    Rs3 => "rs3",
    OpSel0 => "op_sel_0",
    OpSel1 => "op_sel_1",
    OpSel2 => "op_sel_2",
    Op0 => "op_0",
    Op1 => "op_1",
    Op2 => "op_2",
    AccQdata0 => "acc_qdata_0",
    AccQdata1 => "acc_qdata_1",
    AccQdata2 => "acc_qdata_2",
    LsuQHs => "lsu_q_hs",
    LsuQaddr => "lsu_qaddr",
    FpuOutHs => "fpu_out_hs",
    FpuOutAcc => "fpu_out_acc",
    FprWe => "fpr_we",
    FprWaddr => "fpr_waddr",
    FprWdata => "fpr_wdata",
    AccWbReady => "acc_wb_ready",
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
