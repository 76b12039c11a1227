// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Merge performance metrics of multiple harts into a single CSV file
//!
//!     Usage: perf-csv <in_dir> <csv>
//!
//! This program collects all `hart_<id>_perf.json` files in the input
//! directory, as dumped by `gen-trace`, and writes one CSV row per hart.

use std::io;
use std::path::PathBuf;

use anyhow::Context;

use snitch_trace::perf::csv;

fn main() -> anyhow::Result<()> {
    let matches = clap::Command::new("perf-csv")
        .about("Merge per-hart performance metrics into a single CSV file")
        .arg(clap::arg!(<in_dir> "Input directory").value_parser(clap::value_parser!(PathBuf)))
        .arg(clap::arg!(<csv> "CSV output file").value_parser(clap::value_parser!(PathBuf)))
        .get_matches();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .without_time()
        .with_target(false)
        .init();

    let dir = matches
        .get_one::<PathBuf>("in_dir")
        .context("No input directory specified")?;
    let output = matches
        .get_one::<PathBuf>("csv")
        .context("No output file specified")?;

    let table = csv::merge_dir(dir)?;
    if table.is_empty() {
        tracing::warn!("No performance dumps found in {}", dir.display());
    }
    std::fs::write(output, table.to_string())
        .with_context(|| format!("Could not write {}", output.display()))?;
    Ok(())
}
