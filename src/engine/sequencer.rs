// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Hardware loop sequencer
//!
//! The core offloads instructions for the FP subsystem, including `frep`
//! loop headers, in program order. The sequencer replays loop bodies, so the
//! stream of instructions actually issued by the FP subsystem differs from the
//! offloaded one. This module reconstructs the issued stream.

use std::collections::VecDeque;

use crate::annotation::{self, Annotations, Signal};
use crate::trace::Line;

use super::error::{Error, Inconsistency};
use super::{Output, Policy};

/// Signals reported by the sequencer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signals {
    /// Loop configuration pushed in this cycle, if any
    pub config: Option<LoopConfig>,
}

impl TryFrom<&Annotations> for Signals {
    type Error = annotation::Error;

    fn try_from(a: &Annotations) -> Result<Self, Self::Error> {
        let config = if a.flag(Signal::CbufPush)? {
            Some(LoopConfig {
                max_inst: a.get(Signal::MaxInst)?,
                max_rpt: a.get(Signal::MaxRpt)?,
                stg_mask: a.get(Signal::StgMask)?,
                stg_max: a.get(Signal::StgMax)?,
                is_outer: a.flag(Signal::IsOuter)?,
                header: None,
            })
        } else {
            None
        };
        Ok(Self { config })
    }
}

/// Configuration of a hardware loop
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopConfig {
    /// Index of the last instruction in the loop body
    pub max_inst: u64,
    /// Index of the last repetition
    pub max_rpt: u64,
    /// Register staggering mask
    pub stg_mask: u64,
    /// Maximum register stagger
    pub stg_max: u64,
    /// Whether the body is repeated as a whole (outer) or per instruction
    pub is_outer: bool,
    /// PC of the `frep` instruction configuring this loop
    pub header: Option<String>,
}

impl LoopConfig {
    /// Number of instructions issued by this loop in total
    pub fn issues(&self) -> u64 {
        self.max_inst
            .saturating_add(1)
            .saturating_mul(self.max_rpt.saturating_add(1))
    }

    /// Disassembly of the `frep` instruction configuring this loop
    pub fn disassembly(&self) -> String {
        let mut res = format!(
            "{:<8}{}, {}",
            "frep",
            self.max_rpt.saturating_add(1),
            self.max_inst.saturating_add(1)
        );
        if self.stg_mask != 0 {
            res.push_str(&format!(
                ", {:#b}, {}",
                self.stg_mask,
                self.stg_max.saturating_add(1)
            ));
        }
        res
    }

    /// Annotation for the line buffering this configuration
    pub fn annotation(&self) -> String {
        let kind = if self.is_outer { "outer" } else { "inner" };
        format!("{kind}, {} issues", self.issues())
    }
}

/// An instruction offloaded to the FP subsystem
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Offload {
    /// PC of the offloaded instruction
    pub pc: String,
    /// Performance section in which the instruction was offloaded
    pub section: usize,
    /// Whether the instruction is a loop header
    pub is_loop: bool,
}

/// An instruction issued by the FP subsystem
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Issue {
    /// PC of the instruction, `None` if it could not be determined
    pub pc: Option<String>,
    /// Performance section in which the instruction was offloaded
    pub section: Option<usize>,
    /// PC of the loop header, if the instruction was issued by a loop
    pub header: Option<String>,
    /// Repetition and body index, if the instruction was issued by a loop
    pub coords: Option<(u64, u64)>,
}

#[derive(Clone, Debug)]
struct Replay {
    pc: String,
    section: usize,
    coords: (u64, u64),
}

/// The loop currently issuing instructions
#[derive(Clone, Debug)]
struct ActiveLoop {
    config: LoopConfig,
    inst_iter: u64,
    replay: VecDeque<Replay>,
    body: Vec<(String, usize)>,
}

impl ActiveLoop {
    fn new(config: LoopConfig) -> Self {
        Self {
            config,
            inst_iter: 0,
            replay: Default::default(),
            body: Default::default(),
        }
    }

    /// Buffer the next body instruction and all of its repetitions known yet
    fn buffer(&mut self, pc: String, section: usize) {
        let iter = self.inst_iter;
        let max_rpt = self.config.max_rpt;
        if self.config.is_outer {
            self.replay.push_back(Replay {
                pc: pc.clone(),
                section,
                coords: (0, iter),
            });
            self.body.push((pc, section));
            if iter == self.config.max_inst {
                for rpt in 1..=max_rpt {
                    let body = self.body.iter().zip(0..);
                    self.replay
                        .extend(body.map(|((pc, section), idx)| Replay {
                            pc: pc.clone(),
                            section: *section,
                            coords: (rpt, idx),
                        }));
                }
            }
        } else {
            self.replay.extend((0..=max_rpt).map(|rpt| Replay {
                pc: pc.clone(),
                section,
                coords: (rpt, iter),
            }));
        }
        self.inst_iter += 1;
    }

    fn is_last(&self, coords: (u64, u64)) -> bool {
        coords == (self.config.max_rpt, self.config.max_inst)
    }
}

/// State of the sequencer
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Offloads not yet issued by the FP subsystem
    fpss_pcs: VecDeque<Offload>,
    /// PCs of loop headers without configuration
    fseq_pcs: VecDeque<String>,
    /// Configurations of loops not yet started
    configs: VecDeque<LoopConfig>,
    current: Option<ActiveLoop>,
}

impl State {
    /// Record an instruction offloaded by the core
    pub fn offload(&mut self, offload: Offload) {
        if offload.is_loop {
            self.fseq_pcs.push_back(offload.pc.clone());
        }
        self.fpss_pcs.push_back(offload);
    }

    /// Claim the oldest loop header lacking a configuration
    pub fn claim_header<P: Policy + ?Sized>(
        &mut self,
        cycle: u64,
        policy: &mut P,
    ) -> Result<Option<String>, Inconsistency> {
        let header = self.fseq_pcs.pop_front();
        if header.is_none() {
            policy.report(Inconsistency::MissingLoopHeader { cycle })?;
        }
        Ok(header)
    }

    /// Buffer the configuration of a loop to be started later
    pub fn push_config(&mut self, config: LoopConfig) {
        tracing::debug!(
            header = config.header.as_deref(),
            issues = config.issues(),
            "Buffering loop configuration"
        );
        self.configs.push_back(config);
    }

    /// Emulate the issue of an instruction by the FP subsystem
    pub fn emulate<P: Policy + ?Sized>(
        &mut self,
        cycle: u64,
        policy: &mut P,
    ) -> Result<Issue, Inconsistency> {
        if self.current.is_none() && self.fpss_pcs.front().is_some_and(|o| o.is_loop) {
            self.fpss_pcs.pop_front();
            match self.configs.pop_front() {
                Some(config) => self.current = Some(ActiveLoop::new(config)),
                None => policy.report(Inconsistency::MissingLoopConfig { cycle })?,
            }
        }

        let Some(active) = self.current.as_mut() else {
            return match self.fpss_pcs.pop_front() {
                Some(offload) => Ok(Issue {
                    pc: Some(offload.pc),
                    section: Some(offload.section),
                    ..Default::default()
                }),
                None => policy
                    .report(Inconsistency::MissingOffload { cycle })
                    .map(|_| Default::default()),
            };
        };

        if active.inst_iter <= active.config.max_inst {
            match self.fpss_pcs.pop_front() {
                Some(offload) => {
                    if offload.is_loop {
                        policy.report(Inconsistency::NestedLoop {
                            cycle,
                            header: active.config.header.clone(),
                        })?;
                    }
                    active.buffer(offload.pc, offload.section);
                }
                None => policy.report(Inconsistency::MissingOffload { cycle })?,
            }
        }

        let header = active.config.header.clone();
        let Some(entry) = active.replay.pop_front() else {
            return Ok(Issue {
                header,
                ..Default::default()
            });
        };
        if active.is_last(entry.coords) {
            tracing::debug!(header = header.as_deref(), "Loop finished");
            self.current = None;
        }
        Ok(Issue {
            pc: Some(entry.pc),
            section: Some(entry.section),
            header,
            coords: Some(entry.coords),
        })
    }

    /// Number of offloaded instructions not yet issued, excluding loop headers
    pub fn pending_offloads(&self) -> usize {
        self.fpss_pcs.iter().filter(|o| !o.is_loop).count()
    }

    /// Number of sequencer instructions not yet issued
    ///
    /// This includes loop headers lacking a configuration and buffered
    /// configurations of loops not yet started.
    pub fn pending_loops(&self) -> usize {
        self.fseq_pcs.len() + self.configs.len()
    }

    /// Header of the loop currently issuing instructions, if any
    ///
    /// For a loop with unknown header, an empty string is returned.
    pub fn active_loop(&self) -> Option<&str> {
        self.current
            .as_ref()
            .map(|l| l.config.header.as_deref().unwrap_or_default())
    }
}

/// Process a line reported by the sequencer
pub fn process<P: Policy + ?Sized>(
    line: &Line,
    annotations: &Annotations,
    state: &mut State,
    policy: &mut P,
) -> Result<Output, Error> {
    let Some(mut config) = Signals::try_from(annotations)?.config else {
        return Ok(Default::default());
    };
    config.header = state.claim_header(line.timestamp.cycle, policy)?;
    let output = Output {
        pc: config.header.clone().unwrap_or_default(),
        insn: config.disassembly(),
        annotation: config.annotation(),
    };
    state.push_config(config);
    Ok(output)
}
