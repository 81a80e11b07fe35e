//! Matrix runner — composes discovery, policy, sandbox driver,
//! normalizer, and snapshot matcher into a full per-plugin suite.
//!
//! Each (target, version) cell runs one sandbox cycle. A failing
//! cell never blocks its siblings; every outcome lands in the
//! report as an explicit per-case result.

use std::path::PathBuf;

use tracing::{debug, info};

use vetra_harness_core::{HarnessOptions, PluginDefinition, RunResult, VersionSpec};
use vetra_resolver::VersionResolver;

use crate::discovery::{discover_inputs, TestTarget, FIXTURES_DIR, SNAPSHOTS_DIR};
use crate::driver::SandboxDriver;
use crate::policy::select_versions;
use crate::snapshot::{match_content, SnapshotOutcome};
use crate::structure::structure_snapshot;

/// Plugins that do not run on a given platform. The whole plugin is
/// skipped there rather than failing case by case.
const SKIP_PLUGINS: &[(&str, &[&str])] = &[
    ("windows", &["semgrep", "swiftlint"]),
    ("macos", &["hadolint"]),
];

fn skipped_on_platform(os: &str, plugin: &str) -> bool {
    SKIP_PLUGINS
        .iter()
        .any(|(skip_os, plugins)| *skip_os == os && plugins.contains(&plugin))
}

/// What gets recorded in snapshots for this plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotMode {
    /// Full normalized findings.
    Findings,
    /// Only the field shape of the first finding.
    Structure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseStatus {
    Passed,
    SnapshotWritten,
    Failed(String),
}

/// Outcome of one (target, version) cell.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub target: String,
    pub version: String,
    pub status: CaseStatus,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        !matches!(self.status, CaseStatus::Failed(_))
    }
}

/// Aggregated outcome for one plugin.
#[derive(Debug)]
pub struct MatrixReport {
    pub plugin: String,
    /// True when the plugin is unsupported on this platform and no
    /// cases ran.
    pub skipped: bool,
    pub cases: Vec<CaseResult>,
}

impl MatrixReport {
    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(CaseResult::passed)
    }
}

/// Runs the full (target × version) matrix for one plugin.
#[derive(Debug)]
pub struct MatrixRunner {
    plugin_dir: PathBuf,
    plugin_name: String,
    options: HarnessOptions,
    mode: SnapshotMode,
    resolver: VersionResolver,
}

impl MatrixRunner {
    pub fn new(
        plugin_dir: impl Into<PathBuf>,
        plugin_name: impl Into<String>,
        options: HarnessOptions,
    ) -> Self {
        Self {
            plugin_dir: plugin_dir.into(),
            plugin_name: plugin_name.into(),
            options,
            mode: SnapshotMode::Findings,
            resolver: VersionResolver::new(),
        }
    }

    pub fn with_mode(mut self, mode: SnapshotMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_resolver(mut self, resolver: VersionResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Run every (target, version) cell and collect per-case results.
    pub async fn run(&self) -> MatrixReport {
        let mut report = MatrixReport {
            plugin: self.plugin_name.clone(),
            skipped: false,
            cases: Vec::new(),
        };

        if skipped_on_platform(std::env::consts::OS, &self.plugin_name) {
            info!(plugin = %self.plugin_name, os = std::env::consts::OS, "plugin unsupported on this platform, skipping");
            report.skipped = true;
            return report;
        }

        let plugin = match PluginDefinition::load(&self.plugin_dir, &self.plugin_name) {
            Ok(plugin) => plugin,
            Err(e) => {
                report.cases.push(CaseResult {
                    target: "*".to_string(),
                    version: "*".to_string(),
                    status: CaseStatus::Failed(e.to_string()),
                });
                return report;
            }
        };

        // `Latest` is resolved once per plugin, up front, so the
        // policy itself stays off the network.
        let resolved_latest = match &self.options.linter_version {
            Some(VersionSpec::Latest) => match self.resolver.resolve_latest(&plugin).await {
                Ok(version) => Some(version),
                Err(e) => {
                    report.cases.push(CaseResult {
                        target: "*".to_string(),
                        version: "Latest".to_string(),
                        status: CaseStatus::Failed(e.to_string()),
                    });
                    return report;
                }
            },
            _ => None,
        };

        let fixtures_dir = self.plugin_dir.join(FIXTURES_DIR);
        let snapshots_dir = fixtures_dir.join(SNAPSHOTS_DIR);

        let inputs = match discover_inputs(&fixtures_dir) {
            Ok(inputs) => inputs,
            Err(e) => {
                report.cases.push(CaseResult {
                    target: "*".to_string(),
                    version: "*".to_string(),
                    status: CaseStatus::Failed(format!(
                        "failed to list fixtures at {}: {e}",
                        fixtures_dir.display()
                    )),
                });
                return report;
            }
        };

        let mut targets = Vec::new();
        for fixture in inputs {
            match select_versions(
                &plugin,
                &self.options,
                resolved_latest.as_deref(),
                &snapshots_dir,
                &fixture.prefix,
            ) {
                Ok(versions) if versions.is_empty() => {
                    debug!(target = %fixture.prefix, "no versions selected, target excluded");
                }
                Ok(versions) => targets.push(TestTarget {
                    prefix: fixture.prefix,
                    input: fixture.input,
                    versions,
                }),
                Err(e) => report.cases.push(CaseResult {
                    target: fixture.prefix.clone(),
                    version: "*".to_string(),
                    status: CaseStatus::Failed(e.to_string()),
                }),
            }
        }

        for target in &targets {
            for version in &target.versions {
                let status = self.run_case(&plugin, target, version).await;
                report.cases.push(CaseResult {
                    target: target.prefix.clone(),
                    version: version.clone(),
                    status,
                });
            }
        }

        report
    }

    /// One full Provisioned → TornDown cycle. The sandbox is torn
    /// down whatever happens in between.
    async fn run_case(
        &self,
        plugin: &PluginDefinition,
        target: &TestTarget,
        version: &str,
    ) -> CaseStatus {
        let mut driver =
            match SandboxDriver::new(plugin, &self.plugin_dir, version, self.options.clone()) {
                Ok(driver) => driver,
                Err(e) => return CaseStatus::Failed(e.to_string()),
            };

        let status = self.run_case_inner(&driver, target).await;
        driver.tear_down();
        status
    }

    async fn run_case_inner(&self, driver: &SandboxDriver, target: &TestTarget) -> CaseStatus {
        if let Err(e) = driver.set_up(&target.input).await {
            return CaseStatus::Failed(e.to_string());
        }

        let run = match driver.run_check().await {
            Ok(run) => run,
            Err(e) => return CaseStatus::Failed(e.to_string()),
        };

        // The case is judged by snapshot comparison, not exit code:
        // `--no-fail` notwithstanding, some tools exit non-zero with
        // perfectly comparable findings.
        let content = match self.mode {
            SnapshotMode::Findings => match crate::snapshot::serialize_results(run.normalized()) {
                Ok(content) => content,
                Err(e) => return CaseStatus::Failed(e.to_string()),
            },
            SnapshotMode::Structure => structure_snapshot(&run.findings),
        };

        let snapshot_path = driver.snapshot_path(&target.prefix);
        debug!(snapshot = %snapshot_path.display(), "using snapshot");

        let status = match match_content(&snapshot_path, &content) {
            Ok(SnapshotOutcome::Matched) => CaseStatus::Passed,
            Ok(SnapshotOutcome::Written) => CaseStatus::SnapshotWritten,
            Err(e) => CaseStatus::Failed(e.to_string()),
        };

        if !run.success() || matches!(status, CaseStatus::Failed(_)) || self.options.always_log {
            log_run_output(driver, &run);
        }

        status
    }
}

fn log_run_output(driver: &SandboxDriver, run: &RunResult) {
    info!(exit_code = run.exit_code, "captured tool output");
    if !run.stdout.is_empty() {
        info!(stdout = %run.stdout);
    }
    if !run.stderr.is_empty() {
        info!(stderr = %run.stderr);
    }
    for (name, contents) in driver.invocation_logs() {
        info!(invocation = %name, log = %contents);
    }
}
