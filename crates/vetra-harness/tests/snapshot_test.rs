//! Snapshot matcher tests: record-then-compare semantics.

use std::fs;

use vetra_harness::errors::SnapshotError;
use vetra_harness::snapshot::{match_snapshot, serialize_results, SnapshotOutcome};
use vetra_harness_core::{Finding, NormalizedResults};

fn results(messages: &[&str]) -> NormalizedResults {
    NormalizedResults {
        issues: messages
            .iter()
            .map(|message| Finding {
                tool: "demo".to_string(),
                rule_key: "rule1".to_string(),
                path: "basic.in.py".to_string(),
                message: message.to_string(),
            })
            .collect(),
    }
}

#[test]
fn first_run_records_instead_of_failing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("__snapshots__/basic_v1.0.0.shot");

    let outcome = match_snapshot(&path, &results(&["issue a"])).unwrap();
    assert_eq!(outcome, SnapshotOutcome::Written);
    assert!(path.exists());

    let stored = fs::read_to_string(&path).unwrap();
    assert_eq!(stored, serialize_results(&results(&["issue a"])).unwrap());
}

#[test]
fn matching_content_passes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basic_v1.0.0.shot");

    match_snapshot(&path, &results(&["issue a"])).unwrap();
    let outcome = match_snapshot(&path, &results(&["issue a"])).unwrap();
    assert_eq!(outcome, SnapshotOutcome::Matched);
}

#[test]
fn mismatch_surfaces_both_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basic_v1.0.0.shot");

    match_snapshot(&path, &results(&["issue a"])).unwrap();
    let err = match_snapshot(&path, &results(&["issue b"])).unwrap_err();

    match err {
        SnapshotError::Mismatch {
            expected, actual, ..
        } => {
            assert!(expected.contains("issue a"));
            assert!(actual.contains("issue b"));
        }
        other => panic!("expected mismatch, got: {other}"),
    }
    // The stored snapshot is untouched by a failed comparison.
    let stored = fs::read_to_string(&path).unwrap();
    assert!(stored.contains("issue a"));
}

#[test]
fn serialization_is_stable_and_newline_terminated() {
    let first = serialize_results(&results(&["issue a", "issue b"])).unwrap();
    let second = serialize_results(&results(&["issue a", "issue b"])).unwrap();
    assert_eq!(first, second);
    assert!(first.ends_with('\n'));
    assert!(first.contains("\"ruleKey\": \"rule1\""));
}
