// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Trace annotation engine
//!
//! This module provides the [`Engine`], which processes trace lines and
//! generates [`Annotated`] lines while accounting performance [`Segment`]s.
//!
//! Lines stem from one of three sources, identified by the `source` signal:
//! the scalar core ([`snitch`]), the FP subsystem ([`fpu`]) and the hardware
//! loop [`sequencer`]. The core offloads instructions to the FP subsystem,
//! which issues them at a later point, possibly repeated by the sequencer.
//! Loads and FP computations are retired even later. The engine reconstructs
//! these relations in its [`State`].

pub mod error;
pub mod fpu;
pub mod policy;
pub mod sequencer;
pub mod snitch;
mod state;
pub mod writeback;


use core::fmt;

use crate::annotation::{Annotations, Signal};
use crate::config::Options;
use crate::perf::{self, Segment};
use crate::trace::{Annotated, Line, Timestamp};

pub use error::{Error, Inconsistency};
pub use policy::{Policy, Strict};
pub use state::State;

/// Trace annotation engine
///
/// Individual lines are fed to the engine through
/// [`process_line`][Self::process_line] in trace order. After the last line,
/// the engine is [`finish`][Self::finish]ed, yielding the [`Summary`] of the
/// trace.
///
/// # Example
///
/// ```
/// use snitch_trace::engine;
///
/// let mut engine = engine::builder().build();
/// let line = engine
///     .process_line("1000 1 3 0x80000000 addi a0, a0, 1")
///     .unwrap();
/// assert_eq!(line.map(|l| l.insn), Some("addi a0, a0, 1".into()));
///
/// let summary = engine.finish();
/// assert_eq!(summary.segments.len(), 1);
/// assert!(summary.residue.is_clean());
/// ```
#[derive(Clone, Debug)]
pub struct Engine<P: Policy = Strict> {
    state: State,
    options: Options,
    policy: P,
    last: Option<Timestamp>,
}

impl<P: Policy> Engine<P> {
    /// Process a single trace line
    ///
    /// Returns the annotated line or `None` if the line carries no
    /// information and is to be omitted from the output.
    pub fn process_line(&mut self, line: &str) -> Result<Option<Annotated>, Error> {
        let line = Line::parse(line)?;
        let timestamp = line.timestamp;
        self.state.start(timestamp);

        let shown = (self.options.repeat_timestamps || self.last != Some(timestamp))
            .then_some(timestamp);

        let Some(text) = line.annotations else {
            self.last = Some(timestamp);
            return Ok(Some(Annotated {
                timestamp: shown,
                privilege: line.privilege,
                pc: line.pc.into(),
                insn: line.insn.into(),
                annotation: None,
            }));
        };

        let annotations = Annotations::parse(text)?;
        let output = match Source::try_from(annotations.get(Signal::Source)?)? {
            Source::Snitch => snitch::process(
                &line,
                &annotations,
                &mut self.state,
                &self.options,
                &mut self.policy,
            )?,
            Source::Fpu => fpu::process(
                &line,
                &annotations,
                &mut self.state,
                &self.options,
                &mut self.policy,
            )?,
            Source::Sequencer => {
                sequencer::process(&line, &annotations, &mut self.state.sequencer, &mut self.policy)?
            }
        };

        if output.insn.is_empty() && output.annotation.is_empty() {
            return Ok(None);
        }
        self.last = Some(timestamp);
        Ok(Some(Annotated {
            timestamp: shown,
            privilege: line.privilege,
            pc: output.pc,
            insn: output.insn,
            annotation: Some(output.annotation),
        }))
    }

    /// Retrieve the current [`State`]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Retrieve the [`Options`] this engine was built with
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Retrieve the [`Policy`]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Finish processing, closing the open segment
    ///
    /// The open segment ends at the last timestamp shown. All segments are
    /// [evaluated][perf::evaluate].
    pub fn finish(self) -> Summary {
        let residue = self.state.residue();
        let mut segments = self.state.finish(self.last);
        perf::evaluate(&mut segments);
        Summary { segments, residue }
    }
}

/// Create a new [`Builder`] for [`Engine`]s
pub fn builder() -> Builder {
    Default::default()
}

/// Builder for [`Engine`]s
#[derive(Copy, Clone, Debug, Default)]
pub struct Builder<P = Strict> {
    options: Options,
    policy: P,
}

impl Builder {
    /// Create a new builder for an [`Engine`]
    pub fn new() -> Self {
        Default::default()
    }
}

impl<P> Builder<P> {
    /// Build the [`Engine`] with the given [`Options`]
    ///
    /// New builders assume [`Default`] options.
    pub fn with_options(self, options: &Options) -> Self {
        Self {
            options: *options,
            ..self
        }
    }

    /// Build the [`Engine`] with the given [`Policy`]
    ///
    /// New builders use the [`Strict`] policy.
    pub fn with_policy<Q: Policy>(self, policy: Q) -> Builder<Q> {
        Builder {
            options: self.options,
            policy,
        }
    }

    /// Build the [`Engine`]
    pub fn build(self) -> Engine<P>
    where
        P: Policy,
    {
        Engine {
            state: Default::default(),
            options: self.options,
            policy: self.policy,
            last: None,
        }
    }
}

/// Source of a trace line
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// The scalar core
    Snitch,
    /// The FP subsystem
    Fpu,
    /// The hardware loop sequencer
    Sequencer,
}

impl TryFrom<u64> for Source {
    type Error = Error;

    fn try_from(num: u64) -> Result<Self, Self::Error> {
        match num {
            0 => Ok(Self::Snitch),
            1 => Ok(Self::Fpu),
            2 => Ok(Self::Sequencer),
            err => Err(Error::UnknownSource(err)),
        }
    }
}

/// Unit writing back to a register file
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Writer {
    /// The accelerator interface
    Acc,
    /// The FPU
    Fpu,
    /// The load/store unit
    Lsu,
}

impl Writer {
    /// Retrieve the writer's name
    pub fn name(self) -> &'static str {
        match self {
            Self::Acc => "acc",
            Self::Fpu => "fpu",
            Self::Lsu => "lsu",
        }
    }
}

impl fmt::Display for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Output of a source specific annotator
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Output {
    /// PC to show, possibly differing from the line's PC
    pub pc: String,
    /// Instruction to show
    pub insn: String,
    pub annotation: String,
}

/// Result of processing an entire trace
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    /// Evaluated performance segments
    pub segments: Vec<Segment>,
    /// State left in flight at the end of the trace
    pub residue: Residue,
}

/// State left in flight at the end of a trace
///
/// A complete trace leaves nothing in flight. Any residue indicates that the
/// trace was truncated and that performance metrics may be inaccurate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Residue {
    /// Registers with writebacks in flight, with the number of writebacks
    pub in_flight: Vec<(String, usize)>,
    /// Number of sequencer instructions not issued
    pub unissued_loops: usize,
    /// Number of offloaded instructions not issued, excluding loop headers
    pub unissued_offloads: usize,
    /// Header of a loop which did not issue all of its instructions
    pub unfinished_loop: Option<String>,
}

impl Residue {
    /// Check whether nothing was left in flight
    pub fn is_clean(&self) -> bool {
        self.in_flight.is_empty()
            && self.unissued_loops == 0
            && self.unissued_offloads == 0
            && self.unfinished_loop.is_none()
    }

    /// Generate human readable warnings for the residue
    ///
    /// For any residue, a general warning about inaccurate metrics concludes
    /// the list.
    pub fn warnings(&self) -> Vec<String> {
        let mut res: Vec<_> = self
            .in_flight
            .iter()
            .map(|(reg, n)| format!("{n} transactions still in flight for {reg}."))
            .collect();
        if self.unissued_loops > 0 {
            res.push(format!(
                "{} Sequencer instructions were not issued.",
                self.unissued_loops
            ));
        }
        if self.unissued_offloads > 0 {
            res.push(format!(
                "{} unsequenced FPSS instructions were not issued.",
                self.unissued_offloads
            ));
        }
        if let Some(header) = self.unfinished_loop.as_ref() {
            res.push(format!(
                "Not all FPSS instructions from sequence {header} were issued."
            ));
        }
        if !res.is_empty() {
            res.push(
                "Inconsistent final state; performance metrics may be inaccurate. \
                 Is this trace complete?"
                    .into(),
            );
        }
        res
    }

    /// Log all [warnings][Self::warnings]
    pub fn warn(&self) {
        self.warnings().iter().for_each(|w| tracing::warn!("{w}"));
    }
}
