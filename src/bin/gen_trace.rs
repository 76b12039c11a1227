// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Annotator for Snitch instruction traces
//!
//!     Usage: gen-trace [OPTIONS] [infile.dasm]
//!
//! This program reads a trace from the given file or stdin and prints the
//! annotated trace to stdout, followed by performance metrics for every
//! segment delimited by reads of `mcycle`. Options may be supplied as a TOML
//! file. Flags given on the command line override the file.
//!
//! Warnings are printed to stderr. The log level may be adjusted via the
//! `RUST_LOG` environment variable.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

use snitch_trace::config::Options;
use snitch_trace::engine::{self, policy};

fn main() -> anyhow::Result<()> {
    let matches = clap::Command::new("gen-trace")
        .about("Annotate a Snitch instruction trace and evaluate performance metrics")
        .arg(
            clap::arg!([infile] "A matching ASCII signal dump, read from stdin if omitted")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(clap::arg!(-o --offl "Annotate FPSS and sequencer offloads when they happen in core"))
        .arg(clap::arg!(-s --saddr "Use signed decimal (not unsigned hex) for small addresses"))
        .arg(clap::arg!(-a --allkeys "Include performance metrics measured to compute others"))
        .arg(clap::arg!(-p --permissive "Ignore some state-related issues when they occur"))
        .arg(
            clap::arg!(-d --"dump-perf" <FILE> "Dump performance metrics as JSON")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            clap::arg!(-c --config <FILE> "Options in TOML format")
                .value_parser(clap::value_parser!(PathBuf)),
        )
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

    let mut options: Options = matches
        .get_one::<PathBuf>("config")
        .map(|p| {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("Could not load options from {}", p.display()))?;
            toml::from_str(&text).context("Could not parse options")
        })
        .transpose()?
        .unwrap_or_default();
    options.annotate_offloads |= matches.get_flag("offl");
    options.force_hex_addr &= !matches.get_flag("saddr");
    options.all_keys |= matches.get_flag("allkeys");
    options.permissive |= matches.get_flag("permissive");
    tracing::debug!("Options: {options:?}");

    let input: Box<dyn BufRead> = match matches.get_one::<PathBuf>("infile") {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Could not open trace {}", path.display()))?;
            Box::new(io::BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let mut out = BufWriter::new(io::stdout().lock());

    let mut engine = engine::builder()
        .with_options(&options)
        .with_policy(policy::from_options(&options))
        .build();

    for (num, line) in input.lines().enumerate() {
        let line = line.context("Could not read trace")?;
        if line.trim().is_empty() {
            continue;
        }
        let annotated = engine
            .process_line(&line)
            .with_context(|| format!("Could not process line {}", num + 1))?;
        if let Some(annotated) = annotated {
            writeln!(out, "{annotated}")?;
        }
    }

    let summary = engine.finish();
    writeln!(out, "\n## Performance metrics")?;
    for (i, segment) in summary.segments.iter().enumerate() {
        writeln!(out, "\n{}", segment.report(i, options.all_keys))?;
    }
    out.flush()?;

    if let Some(path) = matches.get_one::<PathBuf>("dump-perf") {
        let file = File::create(path)
            .with_context(|| format!("Could not create {}", path.display()))?;
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer =
            serde_json::Serializer::with_formatter(BufWriter::new(file), formatter);
        summary
            .segments
            .serialize(&mut serializer)
            .context("Could not dump performance metrics")?;
        serializer.into_inner().flush()?;
    }

    summary.residue.warn();
    Ok(())
}
