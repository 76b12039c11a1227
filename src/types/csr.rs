// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Control and status registers

use core::fmt;

/// Address of the `mcycle` CSR, the counter delimiting performance segments
pub const MCYCLE: u16 = 0xb00;

/// Control and status register, identified by its address
///
/// The [`Display`][fmt::Display] impl yields the register's name or, for
/// unknown registers, `csr@<addr>`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Csr(pub u16);

impl TryFrom<u64> for Csr {
    type Error = u64;

    fn try_from(addr: u64) -> Result<Self, Self::Error> {
        u16::try_from(addr)
            .ok()
            .filter(|a| *a < 0x1000)
            .map(Self)
            .ok_or(addr)
    }
}

impl Csr {
    /// Check whether this is the [`MCYCLE`] counter
    pub fn is_mcycle(self) -> bool {
        self.0 == MCYCLE
    }

    /// Retrieve the name of a register with a fixed name
    fn fixed_name(self) -> Option<&'static str> {
        let name = match self.0 {
            0xc00 => "cycle",
            0xc01 => "time",
            0xc02 => "instret",
            0xc80 => "cycleh",
            0xc81 => "timeh",
            0xc82 => "instreth",
            0x100 => "sstatus",
            0x104 => "sie",
            0x105 => "stvec",
            0x106 => "scounteren",
            0x140 => "sscratch",
            0x141 => "sepc",
            0x142 => "scause",
            0x143 => "stval",
            0x144 => "sip",
            0x180 => "satp",
            0x200 => "bsstatus",
            0x204 => "bsie",
            0x205 => "bstvec",
            0x240 => "bsscratch",
            0x241 => "bsepc",
            0x242 => "bscause",
            0x243 => "bstval",
            0x244 => "bsip",
            0x280 => "bsatp",
            0xa00 => "hstatus",
            0xa02 => "hedeleg",
            0xa03 => "hideleg",
            0xa80 => "hgatp",
            0x007 => "utvt",
            0x045 => "unxti",
            0x046 => "uintstatus",
            0x048 => "uscratchcsw",
            0x049 => "uscratchcswl",
            0x107 => "stvt",
            0x145 => "snxti",
            0x146 => "sintstatus",
            0x148 => "sscratchcsw",
            0x149 => "sscratchcswl",
            0x307 => "mtvt",
            0x345 => "mnxti",
            0x346 => "mintstatus",
            0x348 => "mscratchcsw",
            0x349 => "mscratchcswl",
            0x300 => "mstatus",
            0x301 => "misa",
            0x302 => "medeleg",
            0x303 => "mideleg",
            0x304 => "mie",
            0x305 => "mtvec",
            0x306 => "mcounteren",
            0x340 => "mscratch",
            0x341 => "mepc",
            0x342 => "mcause",
            0x343 => "mtval",
            0x344 => "mip",
            0x7a0 => "tselect",
            0x7a1 => "tdata1",
            0x7a2 => "tdata2",
            0x7a3 => "tdata3",
            0x7b0 => "dcsr",
            0x7b1 => "dpc",
            0x7b2 => "dscratch",
            MCYCLE => "mcycle",
            0xb02 => "minstret",
            0xb80 => "mcycleh",
            0xb82 => "minstreth",
            0xf11 => "mvendorid",
            0xf12 => "marchid",
            0xf13 => "mimpid",
            0xf14 => "mhartid",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Csr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.fixed_name() {
            return f.pad(name);
        }

        // Numbered counters and configuration registers
        let addr = self.0;
        let lo = addr & 0x1f;
        match addr {
            0xc03..=0xc1f => write!(f, "hpmcounter{lo}"),
            0xc83..=0xc9f => write!(f, "hpmcounter{lo}h"),
            0xb03..=0xb1f => write!(f, "mhpmcounter{lo}"),
            0xb83..=0xb9f => write!(f, "mhpmcounter{lo}h"),
            0x323..=0x33f => write!(f, "mhpmevent{lo}"),
            0x3a0..=0x3a3 => write!(f, "pmpcfg{}", addr & 0xf),
            0x3b0..=0x3bf => write!(f, "pmpaddr{}", addr & 0xf),
            _ => write!(f, "csr@{addr:x}"),
        }
    }
}
