// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Engine state

use crate::literal::float::Format;
use crate::perf::Segment;
use crate::trace::Timestamp;
use crate::types::reg::{Fpr, Gpr};

use super::{Residue, sequencer, writeback};

/// State reconstructed from a trace
///
/// The state is shared by all sources. It holds pending writebacks, the
/// sequencer's state and the performance segments. The last segment is
/// always the open one.
#[derive(Clone, Debug)]
pub struct State {
    /// Pending GPR writebacks with their issue cycles
    pub gprs: writeback::Queue<Gpr, u64>,

    /// Pending FPR writebacks with their formats and issue cycles
    pub fprs: writeback::Queue<Fpr, (Format, u64)>,

    /// State of the sequencer
    pub sequencer: sequencer::State,

    /// Section of the last instruction issued by the FP subsystem
    pub section: usize,

    closed: Vec<Segment>,
    open: Segment,
}

impl Default for State {
    fn default() -> Self {
        Self {
            gprs: Default::default(),
            fprs: Default::default(),
            sequencer: Default::default(),
            section: 0,
            closed: Vec::new(),
            open: Segment::default(),
        }
    }
}

impl State {
    /// Retrieve the open segment
    pub fn current(&mut self) -> &mut Segment {
        &mut self.open
    }

    /// Retrieve the index of the open segment
    pub fn section_index(&self) -> usize {
        self.closed.len()
    }

    /// Retrieve the segment with the given index
    ///
    /// Indices past the open segment refer to the open segment.
    pub fn segment(&mut self, index: usize) -> &mut Segment {
        self.closed.get_mut(index).unwrap_or(&mut self.open)
    }

    /// Iterate over all segments, including the open one
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.closed.iter().chain(core::iter::once(&self.open))
    }

    /// Record the start of the trace if no start is known yet
    pub fn start(&mut self, timestamp: Timestamp) {
        if self.closed.is_empty() && self.open.start.is_none() {
            self.open.start = Some(timestamp.cycle);
            self.open.tstart = timestamp.time_ns();
        }
    }

    /// Close the open segment after a read of `mcycle`
    ///
    /// The open segment ends at the `value` read. The next segment starts two
    /// cycles later, accounting for the latency of the read itself.
    pub fn close_segment(&mut self, timestamp: Timestamp, value: u64) {
        let next = Segment {
            tstart: timestamp.time_ns(),
            start: Some(value.saturating_add(2)),
            ..Default::default()
        };
        let mut closed = core::mem::replace(&mut self.open, next);
        closed.tend = timestamp.time_ns();
        closed.end = value;
        tracing::debug!(
            section = self.closed.len(),
            start = closed.start,
            end = closed.end,
            "Closing segment"
        );
        self.closed.push(closed);
    }

    /// Close the open segment at the end of the trace
    ///
    /// If a final timestamp is given, the open segment ends there. All
    /// segments are returned.
    pub fn finish(mut self, last: Option<Timestamp>) -> Vec<Segment> {
        if let Some(last) = last {
            self.open.tend = last.time_ns();
            self.open.end = last.cycle;
        }
        self.closed.push(self.open);
        self.closed
    }

    /// Collect everything left in flight
    pub fn residue(&self) -> Residue {
        let gprs = self.gprs.in_flight().map(|(r, n)| (r.to_string(), n));
        let fprs = self.fprs.in_flight().map(|(r, n)| (r.to_string(), n));
        Residue {
            in_flight: gprs.chain(fprs).collect(),
            unissued_loops: self.sequencer.pending_loops(),
            unissued_offloads: self.sequencer.pending_offloads(),
            unfinished_loop: self.sequencer.active_loop().map(Into::into),
        }
    }
}
