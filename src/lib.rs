// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

//! # Annotation and performance evaluation of Snitch instruction traces
//!
//! This crate consumes instruction traces of a Snitch core complex as emitted
//! by RTL simulations and produces
//!
//! - a human readable trace annotated with operands, memory accesses and
//!   register writebacks and
//! - performance metrics for segments of the trace delimited by reads of the
//!   `mcycle` CSR.
//!
//! Trace lines stem from three sources: the scalar core, the floating point
//! subsystem and a hardware loop sequencer feeding the latter. See [engine]
//! for how lines are processed and [perf] for the metrics.
//!
//! # Features
//!
//! - `serde`: deserialization of [config::Options] and serialization of
//!   performance [perf::Segment]s
//! - `json`: merging of per-hart JSON dumps via [`perf::csv`]
//! - `cli`: the `gen-trace` and `perf-csv` binaries (default)
//!
//! # Example
//!
//! ```
//! use snitch_trace::engine;
//!
//! let trace = "\
//!     1000 1 3 0x80000000 csrr a0, mcycle #; 'source': 0x0, 'stall': 0x0, \
//!     'exception': 0x0, 'fpu_offload': 0x0, 'is_seq_insn': 0x0, \
//!     'opa_select': 0x0, 'opb_select': 0x8, 'rs1': 0x0, 'rs2': 0x0, \
//!     'rd': 0xa, 'opa': 0x0, 'opb': 0x64, 'csr_addr': 0xb00, 'is_load': 0x0, \
//!     'is_store': 0x0, 'is_branch': 0x0, 'ls_size': 0x2, 'alu_result': 0x0, \
//!     'gpr_rdata_1': 0x0, 'write_rd': 0x1, 'writeback': 0x64, \
//!     'retire_load': 0x0, 'lsu_rd': 0x0, 'ld_result_32': 0x0, \
//!     'retire_acc': 0x0, 'acc_pid': 0x0, 'acc_pdata_32': 0x0, \
//!     'pc_d': 0x80000004\n\
//!     2000 2 3 0x80000004 nop\n";
//!
//! let mut engine = engine::builder().build();
//! for line in trace.lines() {
//!     if let Some(annotated) = engine.process_line(line).unwrap() {
//!         println!("{annotated}");
//!     }
//! }
//!
//! let summary = engine.finish();
//! assert_eq!(summary.segments.len(), 2);
//! assert_eq!(summary.segments[1].start, Some(102));
//! for (i, segment) in summary.segments.iter().enumerate() {
//!     println!("{}", segment.report(i, false));
//! }
//! ```

pub mod annotation;
pub mod config;
pub mod engine;
pub mod literal;
pub mod perf;
pub mod trace;
pub mod types;
