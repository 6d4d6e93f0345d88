//! End-to-end pipeline tests driving a fake benchmark executable.
//!
//! The fake executable is a shell script emitting the comparison-mode wire
//! format, so the whole chain — build step, process execution, parsing,
//! aggregation, emission, clean step — runs without the real ANN binaries.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use annsweep_cli::{emit_reports, GridRunner, Toolchain};
use annsweep_core::{Campaign, SweepAxis, Variant};
use annsweep_report::{append_table_report, render_charts, write_csv_report};

const FAKE_SCRIPT: &str = r#"#!/bin/sh
size=0
while [ $# -gt 0 ]; do
  if [ "$1" = "-f" ]; then size="$2"; fi
  shift
done
printf 'tAverageApproximate:12.5\ntAverageTrue:10.0\nAAF:1.25\nMAF:%s.0\n' "$size"
"#;

fn write_fake_executable(bin_dir: &Path) -> PathBuf {
    let path = bin_dir.join("fake_test");
    fs::write(&path, FAKE_SCRIPT).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A two-variant campaign over an unsorted grid, exercising both the
/// series axis and the emitters' re-ordering obligations.
fn fake_campaign() -> Campaign {
    let variant = |label: &str| Variant {
        label: label.to_string(),
        program: "fake_test".to_string(),
        base_args: vec!["-k".to_string(), "4".to_string()],
    };

    Campaign {
        name: "fake".to_string(),
        axis: SweepAxis {
            label: "Training Size".to_string(),
            echo_key: None,
        },
        grid: vec![500, 100, 1000],
        sweep_flag: "-f".to_string(),
        self_report: false,
        variants: vec![variant("LSH"), variant("CUBE")],
        build_target: "tests".to_string(),
        output_subdir: "EVALUATION".to_string(),
    }
}

#[test]
fn full_pipeline_produces_all_artifacts() {
    let bin_dir = tempfile::tempdir().unwrap();
    write_fake_executable(bin_dir.path());

    let runner = GridRunner::new(Toolchain::new("true", "."), bin_dir.path(), 1);
    let campaign = fake_campaign();
    let table = runner.run(&campaign).unwrap();

    // |grid| x |variants| rows, in execution order
    assert_eq!(table.rows.len(), 6);
    assert_eq!(
        table.schema,
        vec!["tAverageApproximate", "tAverageTrue", "AAF", "MAF"]
    );
    let order: Vec<(i64, &str)> = table
        .rows
        .iter()
        .map(|r| (r.sweep_value, r.series.as_str()))
        .collect();
    assert_eq!(order[0], (500, "LSH"));
    assert_eq!(order[1], (500, "CUBE"));
    assert_eq!(order[2], (100, "LSH"));

    // Emit all three artifacts
    let out_dir = tempfile::tempdir().unwrap();
    append_table_report(&table, &out_dir.path().join("table.md")).unwrap();
    render_charts(&table, out_dir.path()).unwrap();
    write_csv_report(&table, &out_dir.path().join("eval.csv")).unwrap();

    let table_text = fs::read_to_string(out_dir.path().join("table.md")).unwrap();
    assert!(table_text.contains("Training Size = 100"));
    assert!(table_text.contains("Training Size = 1000"));

    let csv_text = fs::read_to_string(out_dir.path().join("eval.csv")).unwrap();
    assert!(csv_text.starts_with("Training Size=100,"));

    for key in &table.schema {
        assert!(out_dir.path().join(format!("{}.svg", key)).exists());
    }
}

#[test]
fn parallel_execution_matches_sequential() {
    let bin_dir = tempfile::tempdir().unwrap();
    write_fake_executable(bin_dir.path());
    let campaign = fake_campaign();

    let sequential = GridRunner::new(Toolchain::new("true", "."), bin_dir.path(), 1)
        .run(&campaign)
        .unwrap();
    let parallel = GridRunner::new(Toolchain::new("true", "."), bin_dir.path(), 3)
        .run(&campaign)
        .unwrap();

    // Appends are folded in plan order either way
    let rows = |t: &annsweep_core::ResultsTable| {
        t.rows
            .iter()
            .map(|r| (r.sweep_value, r.series.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(rows(&sequential), rows(&parallel));
}

#[test]
fn emitter_failure_leaves_other_artifacts_valid() {
    let bin_dir = tempfile::tempdir().unwrap();
    write_fake_executable(bin_dir.path());

    let runner = GridRunner::new(Toolchain::new("true", "."), bin_dir.path(), 1);
    let table = runner.run(&fake_campaign()).unwrap();

    let out_dir = tempfile::tempdir().unwrap();
    // A directory squatting on the CSV path makes that emitter fail
    fs::create_dir(out_dir.path().join("eval.csv")).unwrap();

    let err = emit_reports(&table, out_dir.path()).unwrap_err();
    assert!(err.to_string().contains("report artifact"));

    // The table and chart emitters still completed
    let table_text = fs::read_to_string(out_dir.path().join("table.md")).unwrap();
    assert!(table_text.contains("Training Size = 100"));
    assert!(out_dir.path().join("AAF.svg").exists());
}

#[test]
fn clean_runs_even_when_a_run_fails() {
    let bin_dir = tempfile::tempdir().unwrap();
    // No fake executable: every run fails to spawn
    let work_dir = tempfile::tempdir().unwrap();

    // "touch <target>" leaves one file per toolchain invocation behind
    let runner = GridRunner::new(
        Toolchain::new("touch", work_dir.path()),
        bin_dir.path(),
        1,
    );
    let err = runner.run(&fake_campaign()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to execute"));

    // Build ran before the sweep, clean ran on the error path
    assert!(work_dir.path().join("tests").exists());
    assert!(work_dir.path().join("clean").exists());
}
