//! Findings and run results.
//!
//! A `RunResult` captures one external-command invocation verbatim.
//! The normalized projection used for snapshot comparison is computed
//! lazily and at most once: a passing case that never inspects it
//! must not pay for sorting and scrubbing thousands of findings.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// One issue reported by the external analysis command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub tool: String,
    #[serde(rename = "ruleKey")]
    pub rule_key: String,
    pub path: String,
    pub message: String,
}

/// Normalized findings in canonical order — the value recorded in
/// snapshot files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResults {
    pub issues: Vec<Finding>,
}

/// Scrub the sandbox path out of every message and impose a
/// canonical ordering, so recorded snapshots are portable across
/// machines.
///
/// Scrubbing happens before the sort: the canonical order must hold
/// for the messages as they appear in the output, otherwise a second
/// pass over already-normalized findings could reorder them.
///
/// Sort keys, ascending: tool, rule key, path, message. The sort is
/// stable, so fully-equal records keep their relative input order.
/// Idempotent, and independent of the input ordering.
pub fn normalize_findings(mut findings: Vec<Finding>, sandbox_path: &str) -> NormalizedResults {
    if !sandbox_path.is_empty() {
        for finding in &mut findings {
            if finding.message.contains(sandbox_path) {
                finding.message = finding.message.replace(sandbox_path, "");
            }
        }
    }

    findings.sort_by(|a, b| {
        (&a.tool, &a.rule_key, &a.path, &a.message).cmp(&(&b.tool, &b.rule_key, &b.path, &b.message))
    });

    NormalizedResults { issues: findings }
}

/// The outcome of one external-command invocation inside a sandbox.
///
/// Non-zero exit codes and unparsable stdout are data here, not
/// errors: the assertion layer judges the case by snapshot
/// comparison, never by exit code alone.
#[derive(Debug)]
pub struct RunResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Findings parsed from stdout; empty when stdout was not JSON.
    pub findings: Vec<Finding>,
    sandbox_path: String,
    normalized: OnceLock<NormalizedResults>,
}

impl RunResult {
    pub fn new(
        exit_code: i32,
        stdout: String,
        stderr: String,
        findings: Vec<Finding>,
        sandbox_path: String,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            findings,
            sandbox_path,
            normalized: OnceLock::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Normalized projection, computed on first access and immutable
    /// afterward.
    pub fn normalized(&self) -> &NormalizedResults {
        self.normalized
            .get_or_init(|| normalize_findings(self.findings.clone(), &self.sandbox_path))
    }
}
