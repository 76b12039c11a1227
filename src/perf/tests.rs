// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

use super::*;

fn busy_segment() -> Segment {
    Segment {
        start: Some(1),
        end: 100,
        snitch_issues: 50,
        snitch_loads: 2,
        snitch_load_latency: 6,
        snitch_fseq_offloads: 10,
        fpss_issues: 20,
        fpss_loads: 5,
        fpss_load_latency: 10,
        fpss_fpu_issues: 10,
        fpss_fpu_latency: 40,
        ..Default::default()
    }
}

#[test]
fn metrics() {
    let metrics = busy_segment().metrics();
    assert_eq!(metrics.cycles, 100);
    assert_eq!(metrics.fpss_section_latency, 0);
    assert_eq!(metrics.snitch_avg_load_latency, 3.0);
    assert_eq!(metrics.snitch_occupancy, 0.5);
    assert_eq!(metrics.fpss_occupancy, 0.2);
    assert_eq!(metrics.fpss_fpu_occupancy, 0.1);
    assert_eq!(metrics.fpss_fpu_rel_occupancy, 0.5);
    assert_eq!(metrics.fseq_yield, 2.0);
    assert_eq!(metrics.fseq_fpu_yield, 2.0);
    assert_eq!(metrics.fpss_avg_fpu_latency, 4.0);
    assert_eq!(metrics.fpss_avg_load_latency, 2.0);
    assert_eq!(metrics.snitch_fseq_rel_offloads, 10.0 / 60.0);
    assert_eq!(metrics.total_ipc, 0.2 + 0.5);
}

#[test]
fn fpss_section_latency() {
    let segment = Segment {
        start: Some(10),
        end: 19,
        end_fpss: 24,
        ..Default::default()
    };
    let metrics = segment.metrics();
    assert_eq!(metrics.fpss_section_latency, 5);
    assert_eq!(metrics.cycles, 15);
}

#[test]
fn unknown_start() {
    let segment = Segment {
        end: 9,
        snitch_issues: 5,
        ..Default::default()
    };
    let metrics = segment.metrics();
    assert_eq!(metrics.cycles, 10);
    assert_eq!(metrics.snitch_occupancy, 0.5);
}

#[test]
fn zero_cycles() {
    let segment = Segment {
        start: Some(5),
        end: 4,
        snitch_issues: 3,
        fpss_issues: 2,
        ..Default::default()
    };
    let metrics = segment.metrics();
    assert_eq!(metrics.cycles, 0);
    assert_eq!(metrics.snitch_occupancy, 0.0);
    assert_eq!(metrics.fpss_occupancy, 0.0);
    assert_eq!(metrics.fseq_yield, 0.0);
    assert_eq!(metrics.fseq_fpu_yield, 0.0);
    assert_eq!(metrics.total_ipc, 0.0);
}

#[test]
fn division() {
    assert_eq!(safe_div(3u64, 0u64), 0.0);
    assert_eq!(safe_div(3u64, 2u64), 1.5);
    assert_eq!(safe_div(-4i64, 2u64), -2.0);
    assert_eq!(safe_div(1.0, 0.0), 0.0);
}

#[test]
fn evaluation() {
    let mut segments = vec![busy_segment(), Segment::default()];
    assert!(segments[0].values().iter().all(|(k, _)| *k != "cycles"));

    evaluate(&mut segments);
    assert!(segments.iter().all(|s| s.metrics.is_some()));
    let values = segments[0].values();
    assert_eq!(values.len(), 29);
    assert_eq!(values.last(), Some(&("total_ipc", Value::Float(0.2 + 0.5))));
    assert!(values.contains(&("cycles", Value::Int(100))));

    let idle = segments[1].metrics.unwrap_or_default();
    assert_eq!(idle.cycles, 1);
    assert_eq!(idle.snitch_occupancy, 0.0);
    assert_eq!(idle.total_ipc, 0.0);
}

#[test]
fn value_rendering() {
    assert_eq!(Value::None.to_string(), "None");
    assert_eq!(Value::Int(42).to_string(), "42");
    assert_eq!(Value::Int(0x1_0000).to_string(), "0x00010000");
    assert_eq!(Value::Float(0.5).to_string(), "0.5");
    assert_eq!(Value::Float(10.0 / 60.0).to_string(), "1.7e-1");
    assert_eq!(format!("{:>6}", Value::Int(7)), "     7");
}

#[test]
fn report() {
    let mut segment = Segment {
        end: 10,
        end_fpss: 15,
        snitch_issues: 4,
        ..Default::default()
    };
    segment.evaluate();

    let report = segment.report(3, false).to_string();
    let mut lines = report.lines();
    assert_eq!(
        lines.next(),
        Some("Performance metrics for section 3 @ (None, 10):")
    );
    assert_eq!(lines.next(), Some(format!("{:<40}{:>10}", "tstart", "0.0").as_str()));
    assert!(report.contains(&format!("\n{:<40}{:>10}", "cycles", "16")));
    assert!(report.contains(&format!("\n{:<40}{:>10}", "fpss_section_latency", "5")));
    assert!(report.contains(&format!("\n{:<40}{:>10}", "snitch_occupancy", "0.25")));
    for key in OMITTED_KEYS {
        assert!(!report.contains(&format!("\n{key:<40}")), "{key} not omitted");
    }

    let report = segment.report(3, true).to_string();
    assert!(report.contains(&format!("\n{:<40}{:>10}", "start", "None")));
    assert!(report.contains(&format!("\n{:<40}{:>10}", "end_fpss", "15")));
    assert_eq!(report.lines().count(), 30);
}

#[test]
fn report_heading() {
    let segment = Segment {
        start: Some(102),
        end: 200,
        ..Default::default()
    };
    let report = segment.report(1, false).to_string();
    assert_eq!(report.lines().count(), 1 + 16 - OMITTED_KEYS.len());
    assert!(report.starts_with("Performance metrics for section 1 @ (102, 200):\n"));
}

#[cfg(feature = "json")]
mod json {
    use super::*;

    use std::path::Path;

    use serde_json::{Map, Value, json};

    use crate::perf::csv::{Table, hart_id, merge_dir};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("Not an object"),
        }
    }

    #[test]
    fn segment_serialization() {
        let segment = Segment {
            end: 9,
            ..Default::default()
        };
        let value = serde_json::to_value(&segment).expect("Could not serialize");
        assert_eq!(value["start"], Value::Null);
        assert_eq!(value["end"], json!(9));
        assert!(value.get("cycles").is_none());
        assert!(value.get("metrics").is_none());

        let mut segment = segment;
        segment.evaluate();
        let value = serde_json::to_value(&segment).expect("Could not serialize");
        assert_eq!(value["cycles"], json!(10));
        assert_eq!(value["total_ipc"], json!(0.0));
        assert!(value.get("metrics").is_none());
    }

    #[test]
    fn hart_ids() {
        assert_eq!(hart_id(Path::new("hart_3_perf.json")), Some(3));
        assert_eq!(hart_id(Path::new("logs/hart_12_perf.json")), Some(12));
        assert_eq!(hart_id(Path::new("hart__perf.json")), None);
        assert_eq!(hart_id(Path::new("hart_x_perf.json")), None);
        assert_eq!(hart_id(Path::new("hart_-1_perf.json")), None);
        assert_eq!(hart_id(Path::new("trace_hart_00003.txt")), None);
    }

    #[test]
    fn table() {
        let mut table = Table::default();
        assert!(table.is_empty());
        table.push(
            0,
            &[
                object(json!({"start": null, "end": 100})),
                object(json!({"start": 102, "end": 200})),
            ],
        );
        table.push(1, &[object(json!({"end": 50, "label": "a,b", "ok": true}))]);

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.columns(),
            ["0_start", "0_end", "1_start", "1_end", "0_label", "0_ok"]
        );
        assert_eq!(table.get(0, "1_start"), Some(&json!(102)));
        assert_eq!(table.get(1, "1_start"), None);
        assert_eq!(
            table.to_string(),
            ",0_start,0_end,1_start,1_end,0_label,0_ok\n\
             0,,100,102,200,,\n\
             1,,50,,,\"a,b\",True\n"
        );
    }

    #[test]
    fn merge() {
        let dir = std::env::temp_dir().join(format!("snitch-trace-merge-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("Could not create dir");
        std::fs::write(dir.join("hart_1_perf.json"), r#"[{"end": 20}]"#).expect("Could not write");
        std::fs::write(dir.join("hart_0_perf.json"), r#"[{"end": 10}]"#).expect("Could not write");
        std::fs::write(dir.join("notes.txt"), "not a dump").expect("Could not write");

        let table = merge_dir(&dir);
        std::fs::remove_dir_all(&dir).expect("Could not clean up");

        let table = table.expect("Could not merge");
        assert_eq!(table.to_string(), ",0_end\n0,10\n1,20\n");
    }

    #[test]
    fn merge_invalid() {
        let dir = std::env::temp_dir().join(format!("snitch-trace-invalid-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("Could not create dir");
        std::fs::write(dir.join("hart_0_perf.json"), "{").expect("Could not write");

        let res = merge_dir(&dir);
        std::fs::remove_dir_all(&dir).expect("Could not clean up");
        assert!(matches!(res, Err(crate::perf::csv::Error::Json(..))));
    }
}
