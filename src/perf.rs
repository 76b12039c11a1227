// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Performance metrics
//!
//! A trace is divided into [`Segment`]s delimited by reads of the `mcycle`
//! CSR. For each segment, counters are accumulated while processing the trace.
//! After the trace was processed, derived [`Metrics`] are [evaluate]d.

#[cfg(feature = "json")]
pub mod csv;

#[cfg(test)]
mod tests;

use core::fmt;

use crate::literal::{float, word_lit};

/// Width used for rendering floating point metrics
pub const FLOAT_WIDTH: usize = 4;

/// Keys omitted from [`Report`]s unless all keys are requested
///
/// These keys only serve for computing other metrics.
pub const OMITTED_KEYS: &[&str] = &[
    "start",
    "end",
    "end_fpss",
    "snitch_issues",
    "snitch_load_latency",
    "snitch_fseq_offloads",
    "fpss_issues",
    "fpss_fpu_issues",
    "fpss_load_latency",
    "fpss_fpu_latency",
];

/// A performance segment
///
/// Times are in nanoseconds, assuming a simulation time in picoseconds.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Segment {
    pub tstart: f64,
    pub tend: f64,
    /// First cycle of the segment, unknown for empty traces
    pub start: Option<u64>,
    /// Last cycle of the segment
    pub end: u64,
    /// Cycle of the last FP subsystem issue accounted to this segment
    pub end_fpss: u64,
    pub snitch_issues: u64,
    pub snitch_loads: u64,
    pub snitch_stores: u64,
    pub snitch_load_latency: u64,
    pub snitch_fseq_offloads: u64,
    pub fpss_issues: u64,
    pub fpss_loads: u64,
    pub fpss_stores: u64,
    pub fpss_load_latency: u64,
    pub fpss_fpu_issues: u64,
    pub fpss_fpu_latency: u64,
    /// Derived metrics, available after evaluation
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub metrics: Option<Metrics>,
}

impl Segment {
    /// Compute derived [`Metrics`] for this segment
    ///
    /// An unknown start is considered cycle `0`.
    pub fn metrics(&self) -> Metrics {
        let fpss_section_latency = self.end_fpss.saturating_sub(self.end);
        let end = self.end.saturating_add(fpss_section_latency);
        let start = self.start.unwrap_or(0);
        let cycles = (end as i64).wrapping_sub(start as i64).wrapping_add(1);

        let fpss_fpu_rel_occupancy = safe_div(self.fpss_fpu_issues, self.fpss_issues);
        let snitch_occupancy = safe_div(self.snitch_issues, cycles);
        let fpss_occupancy = safe_div(self.fpss_issues, cycles);
        let fseq_fpu_yield = safe_div(self.fpss_fpu_issues, self.snitch_fseq_offloads);
        let fseq_fpu_yield = if fpss_fpu_rel_occupancy != 0.0 {
            fseq_fpu_yield / fpss_fpu_rel_occupancy
        } else {
            0.0
        };

        Metrics {
            snitch_avg_load_latency: safe_div(self.snitch_load_latency, self.snitch_loads),
            snitch_occupancy,
            snitch_fseq_rel_offloads: safe_div(
                self.snitch_fseq_offloads,
                self.snitch_issues + self.snitch_fseq_offloads,
            ),
            fseq_yield: safe_div(self.fpss_issues, self.snitch_fseq_offloads),
            fseq_fpu_yield,
            fpss_section_latency,
            fpss_avg_fpu_latency: safe_div(self.fpss_fpu_latency, self.fpss_fpu_issues),
            fpss_avg_load_latency: safe_div(self.fpss_load_latency, self.fpss_loads),
            fpss_occupancy,
            fpss_fpu_occupancy: safe_div(self.fpss_fpu_issues, cycles),
            fpss_fpu_rel_occupancy,
            cycles,
            total_ipc: fpss_occupancy + snitch_occupancy,
        }
    }

    /// Compute and store derived [`Metrics`] for this segment
    pub fn evaluate(&mut self) {
        self.metrics = Some(self.metrics());
    }

    /// Retrieve all keys and their values
    ///
    /// Derived metrics are only included if the segment was evaluated.
    pub fn values(&self) -> Vec<(&'static str, Value)> {
        let mut res = vec![
            ("tstart", Value::Float(self.tstart)),
            ("tend", Value::Float(self.tend)),
            ("start", self.start.map(Value::from).unwrap_or(Value::None)),
            ("end", self.end.into()),
            ("end_fpss", self.end_fpss.into()),
            ("snitch_issues", self.snitch_issues.into()),
            ("snitch_loads", self.snitch_loads.into()),
            ("snitch_stores", self.snitch_stores.into()),
            ("snitch_load_latency", self.snitch_load_latency.into()),
            ("snitch_fseq_offloads", self.snitch_fseq_offloads.into()),
            ("fpss_issues", self.fpss_issues.into()),
            ("fpss_loads", self.fpss_loads.into()),
            ("fpss_stores", self.fpss_stores.into()),
            ("fpss_load_latency", self.fpss_load_latency.into()),
            ("fpss_fpu_issues", self.fpss_fpu_issues.into()),
            ("fpss_fpu_latency", self.fpss_fpu_latency.into()),
        ];
        if let Some(m) = self.metrics.as_ref() {
            res.extend([
                ("snitch_avg_load_latency", m.snitch_avg_load_latency.into()),
                ("snitch_occupancy", m.snitch_occupancy.into()),
                ("snitch_fseq_rel_offloads", m.snitch_fseq_rel_offloads.into()),
                ("fseq_yield", m.fseq_yield.into()),
                ("fseq_fpu_yield", m.fseq_fpu_yield.into()),
                ("fpss_section_latency", m.fpss_section_latency.into()),
                ("fpss_avg_fpu_latency", m.fpss_avg_fpu_latency.into()),
                ("fpss_avg_load_latency", m.fpss_avg_load_latency.into()),
                ("fpss_occupancy", m.fpss_occupancy.into()),
                ("fpss_fpu_occupancy", m.fpss_fpu_occupancy.into()),
                ("fpss_fpu_rel_occupancy", m.fpss_fpu_rel_occupancy.into()),
                ("cycles", Value::Int(m.cycles)),
                ("total_ipc", m.total_ipc.into()),
            ]);
        }
        res
    }

    /// Create a human readable [`Report`] for this segment
    pub fn report(&self, index: usize, all_keys: bool) -> Report<'_> {
        Report {
            segment: self,
            index,
            all_keys,
        }
    }
}

/// Metrics derived from a [`Segment`]'s counters
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metrics {
    pub snitch_avg_load_latency: f64,
    pub snitch_occupancy: f64,
    /// Share of offloads among all instructions handled by the core
    pub snitch_fseq_rel_offloads: f64,
    /// FP subsystem issues per offload
    pub fseq_yield: f64,
    pub fseq_fpu_yield: f64,
    /// Cycles the FP subsystem kept issuing after the segment's end
    pub fpss_section_latency: u64,
    pub fpss_avg_fpu_latency: f64,
    pub fpss_avg_load_latency: f64,
    pub fpss_occupancy: f64,
    pub fpss_fpu_occupancy: f64,
    /// Share of FPU issues among all FP subsystem issues
    pub fpss_fpu_rel_occupancy: f64,
    pub cycles: i64,
    /// Instructions per cycle of both the core and the FP subsystem
    pub total_ipc: f64,
}

/// Evaluate all segments
pub fn evaluate(segments: &mut [Segment]) {
    segments.iter_mut().for_each(Segment::evaluate);
}

/// Divide, yielding `0` for a zero divisor
pub fn safe_div(dividend: impl Into<Divisible>, divisor: impl Into<Divisible>) -> f64 {
    let divisor = divisor.into().0;
    if divisor != 0.0 {
        dividend.into().0 / divisor
    } else {
        0.0
    }
}

/// Operand of [`safe_div`]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Divisible(f64);

impl From<u64> for Divisible {
    fn from(v: u64) -> Self {
        Self(v as f64)
    }
}

impl From<i64> for Divisible {
    fn from(v: i64) -> Self {
        Self(v as f64)
    }
}

impl From<f64> for Divisible {
    fn from(v: f64) -> Self {
        Self(v)
    }
}

/// Value of a key in a [`Segment`]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Value {
    None,
    Int(i64),
    Float(f64),
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.pad("None"),
            Self::Int(v) => f.pad(&word_lit(*v as u64)),
            Self::Float(v) => f.pad(&float::format(*v, FLOAT_WIDTH)),
        }
    }
}

/// Human readable report of a [`Segment`]
///
/// The report consists of a heading line followed by one line per key.
#[derive(Copy, Clone, Debug)]
pub struct Report<'a> {
    segment: &'a Segment,
    index: usize,
    all_keys: bool,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.segment.start.map(|s| s.to_string());
        let start = start.as_deref().unwrap_or("None");
        write!(
            f,
            "Performance metrics for section {} @ ({start}, {}):",
            self.index, self.segment.end
        )?;
        self.segment
            .values()
            .into_iter()
            .filter(|(k, _)| self.all_keys || !OMITTED_KEYS.contains(k))
            .try_for_each(|(k, v)| write!(f, "\n{k:<40}{v:>10}"))
    }
}
