//! End-to-end matrix tests against a stub analysis command.
//!
//! Covers: first-run snapshot recording, full regression runs over
//! every recorded version in lexical order, non-zero exit codes
//! being judged by snapshot rather than exit status, and launch
//! failures staying contained to their case.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use vetra_harness::matrix::{CaseStatus, MatrixRunner};
use vetra_harness::snapshot::serialize_results;
use vetra_harness_core::{Finding, HarnessOptions, NormalizedResults};

const PLUGIN_TOML: &str = r#"[plugins.definitions.demo]
known_good_version = "1.0.0"
runtime = "node"
package = "demo-pkg"
"#;

const FINDINGS_JSON: &str =
    r#"[{"tool":"demo","ruleKey":"rule1","path":"target1.in.py","message":"unused import"}]"#;

fn demo_plugin_dir(root: &Path) -> PathBuf {
    let dir = root.join("demo");
    fs::create_dir_all(dir.join("fixtures")).unwrap();
    fs::write(dir.join("plugin.toml"), PLUGIN_TOML).unwrap();
    fs::write(dir.join("fixtures/target1.in.py"), "import os\n").unwrap();
    dir
}

fn write_stub(root: &Path, exit_code: i32, stdout: &str) -> PathBuf {
    let path = root.join("stub-tool.sh");
    let script = format!("#!/bin/sh\ncat <<'EOF'\n{stdout}\nEOF\nexit {exit_code}\n");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn stub_options(tool_bin: PathBuf) -> HarnessOptions {
    HarnessOptions::default().with_tool_bin(tool_bin)
}

fn expected_snapshot() -> String {
    let results = NormalizedResults {
        issues: vec![Finding {
            tool: "demo".to_string(),
            rule_key: "rule1".to_string(),
            path: "target1.in.py".to_string(),
            message: "unused import".to_string(),
        }],
    };
    serialize_results(&results).unwrap()
}

// ============================================================
// First-time recording
// ============================================================

#[tokio::test]
async fn first_run_records_then_subsequent_runs_compare() {
    let root = tempfile::tempdir().unwrap();
    let plugin_dir = demo_plugin_dir(root.path());
    let stub = write_stub(root.path(), 0, FINDINGS_JSON);

    let runner = MatrixRunner::new(&plugin_dir, "demo", stub_options(stub));

    let report = runner.run().await;
    assert!(!report.skipped);
    assert_eq!(report.cases.len(), 1);
    assert_eq!(report.cases[0].target, "target1");
    assert_eq!(report.cases[0].version, "1.0.0");
    assert_eq!(report.cases[0].status, CaseStatus::SnapshotWritten);

    let snapshot = plugin_dir.join("fixtures/__snapshots__/target1_v1.0.0.shot");
    assert_eq!(fs::read_to_string(&snapshot).unwrap(), expected_snapshot());

    // Second run compares against the recorded snapshot and passes.
    let report = runner.run().await;
    assert_eq!(report.cases.len(), 1);
    assert_eq!(report.cases[0].status, CaseStatus::Passed);
    assert!(report.all_passed());
}

// ============================================================
// Regression matrix over recorded versions
// ============================================================

#[tokio::test]
async fn recorded_snapshots_drive_one_case_per_version_in_order() {
    let root = tempfile::tempdir().unwrap();
    let plugin_dir = demo_plugin_dir(root.path());
    let stub = write_stub(root.path(), 0, FINDINGS_JSON);

    let snapshots_dir = plugin_dir.join("fixtures/__snapshots__");
    fs::create_dir_all(&snapshots_dir).unwrap();
    fs::write(snapshots_dir.join("target1_v1.2.0.shot"), expected_snapshot()).unwrap();
    fs::write(snapshots_dir.join("target1_v1.0.0.shot"), expected_snapshot()).unwrap();

    let runner = MatrixRunner::new(&plugin_dir, "demo", stub_options(stub));
    let report = runner.run().await;

    let cells: Vec<_> = report
        .cases
        .iter()
        .map(|case| (case.target.as_str(), case.version.as_str()))
        .collect();
    assert_eq!(cells, vec![("target1", "1.0.0"), ("target1", "1.2.0")]);
    assert!(report.all_passed());
}

// ============================================================
// Exit codes are data, not verdicts
// ============================================================

#[tokio::test]
async fn non_zero_exit_with_findings_is_judged_by_snapshot() {
    let root = tempfile::tempdir().unwrap();
    let plugin_dir = demo_plugin_dir(root.path());
    let stub = write_stub(root.path(), 1, FINDINGS_JSON);

    let runner = MatrixRunner::new(&plugin_dir, "demo", stub_options(stub));
    let report = runner.run().await;

    assert_eq!(report.cases.len(), 1);
    assert_eq!(report.cases[0].status, CaseStatus::SnapshotWritten);
    assert!(report.all_passed());
}

#[tokio::test]
async fn unparsable_stdout_is_treated_as_zero_findings() {
    let root = tempfile::tempdir().unwrap();
    let plugin_dir = demo_plugin_dir(root.path());
    let stub = write_stub(root.path(), 0, "this is not json");

    let runner = MatrixRunner::new(&plugin_dir, "demo", stub_options(stub));
    let report = runner.run().await;

    assert_eq!(report.cases[0].status, CaseStatus::SnapshotWritten);
    let snapshot = plugin_dir.join("fixtures/__snapshots__/target1_v1.0.0.shot");
    let stored = fs::read_to_string(&snapshot).unwrap();
    assert!(stored.contains("\"issues\": []"));
}

// ============================================================
// Containment of per-case failures
// ============================================================

#[tokio::test]
async fn launch_failure_fails_the_case_without_aborting_the_run() {
    let root = tempfile::tempdir().unwrap();
    let plugin_dir = demo_plugin_dir(root.path());

    let options = stub_options(root.path().join("no-such-tool"));
    let runner = MatrixRunner::new(&plugin_dir, "demo", options);
    let report = runner.run().await;

    assert_eq!(report.cases.len(), 1);
    assert!(matches!(report.cases[0].status, CaseStatus::Failed(_)));
    assert!(!report.all_passed());
}

#[tokio::test]
async fn snapshot_mismatch_fails_with_both_values_in_the_message() {
    let root = tempfile::tempdir().unwrap();
    let plugin_dir = demo_plugin_dir(root.path());
    let stub = write_stub(root.path(), 0, FINDINGS_JSON);

    let snapshots_dir = plugin_dir.join("fixtures/__snapshots__");
    fs::create_dir_all(&snapshots_dir).unwrap();
    fs::write(
        snapshots_dir.join("target1_v1.0.0.shot"),
        "{\n  \"issues\": []\n}\n",
    )
    .unwrap();

    let runner = MatrixRunner::new(&plugin_dir, "demo", stub_options(stub));
    let report = runner.run().await;

    match &report.cases[0].status {
        CaseStatus::Failed(message) => {
            assert!(message.contains("unused import"));
            assert!(message.contains("\"issues\": []"));
        }
        other => panic!("expected mismatch failure, got: {other:?}"),
    }
}
