//! Sandbox driver — runs the external analysis command for one
//! (target, version) pair and captures the outcome.

use std::path::{Path, PathBuf};

use tracing::debug;

use vetra_harness_core::{Finding, HarnessOptions, PluginDefinition, RunResult, VersionSpec};

use crate::discovery::SNAPSHOTS_DIR;
use crate::errors::{ExecError, ProvisionError};
use crate::sandbox::{Sandbox, TEMP_SUBDIR};

/// Owns one sandbox and the invocation that runs inside it.
#[derive(Debug)]
pub struct SandboxDriver {
    plugin_name: String,
    version: String,
    known_good_version: String,
    fixtures_dir: PathBuf,
    options: HarnessOptions,
    sandbox: Sandbox,
}

impl SandboxDriver {
    /// Create a driver with a freshly provisioned (empty) sandbox.
    pub fn new(
        plugin: &PluginDefinition,
        plugin_dir: &Path,
        version: &str,
        options: HarnessOptions,
    ) -> Result<Self, ProvisionError> {
        let sandbox = Sandbox::create(&options)?;
        Ok(Self {
            plugin_name: plugin.name.clone(),
            version: version.to_string(),
            known_good_version: plugin.known_good_version().to_string(),
            fixtures_dir: plugin_dir.join(crate::discovery::FIXTURES_DIR),
            options,
            sandbox,
        })
    }

    pub fn sandbox_path(&self) -> &Path {
        self.sandbox.path()
    }

    /// Provision and configure the sandbox from a fixture input.
    pub async fn set_up(&self, input: &str) -> Result<(), ProvisionError> {
        self.sandbox.seed(&self.fixtures_dir, input).await?;

        // An explicit override pins the configured plugin version
        // too, so the tool installs exactly what the run tests.
        let pin = match &self.options.linter_version {
            Some(VersionSpec::Explicit(version)) => version.as_str(),
            _ => self.version.as_str(),
        };
        self.sandbox.configure(&self.plugin_name, pin).await
    }

    /// Invoke the external command once and capture everything.
    ///
    /// Non-zero exit and unparsable stdout are recorded, not raised:
    /// a non-zero exit with findings is an expected, successful test
    /// outcome. Only failing to start the process is an error.
    pub async fn run_check(&self) -> Result<RunResult, ExecError> {
        let filter_arg = format!("--filter={}", self.plugin_name);
        let args = [
            "check",
            "--all",
            "--json",
            "--no-fail",
            "--no-cache",
            "--no-progress",
            &filter_arg,
        ];
        debug!(tool = %self.options.tool_bin.display(), ?args, "running external check");

        let mut command = tokio::process::Command::new(&self.options.tool_bin);
        command
            .args(args)
            .current_dir(self.sandbox.path())
            .env_remove("PWD")
            .env_remove("INIT_CWD")
            .env("VETRA_TELEMETRY", "off")
            .env("VETRA_LOG_STDERR", "1")
            .env("VETRA_LOG", &self.options.tool_log);

        // Redirect the subprocess's temp dirs into the sandbox so
        // concurrent cases never collide on shared OS temp paths.
        let sandbox_tmp = self.sandbox.path().join(TEMP_SUBDIR);
        command.env("TMPDIR", &sandbox_tmp).env("TEMP", &sandbox_tmp);

        if let Some(tool_path) = &self.options.tool_path {
            let path = std::env::var_os("PATH").unwrap_or_default();
            let mut entries = vec![tool_path.clone()];
            entries.extend(std::env::split_paths(&path));
            if let Ok(joined) = std::env::join_paths(entries) {
                command.env("PATH", joined);
            }
        }

        let output = command.output().await.map_err(|source| ExecError::Launch {
            program: self.options.tool_bin.clone(),
            source,
        })?;

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let findings: Vec<Finding> = serde_json::from_str(&stdout).unwrap_or_default();

        Ok(RunResult::new(
            exit_code,
            stdout,
            stderr,
            findings,
            self.sandbox.path().display().to_string(),
        ))
    }

    /// Resolve the snapshot file for a target prefix.
    ///
    /// In known-good mode the lookup addresses the snapshot recorded
    /// for the plugin's known-good version, regardless of the
    /// version actually under test.
    pub fn snapshot_path(&self, prefix: &str) -> PathBuf {
        let version = if self.options.test_against_known_good {
            &self.known_good_version
        } else {
            &self.version
        };

        self.fixtures_dir
            .join(SNAPSHOTS_DIR)
            .join(format!("{prefix}_v{version}.shot"))
    }

    /// Collect invocation log files the tool wrote inside the
    /// sandbox, for failure diagnostics.
    pub fn invocation_logs(&self) -> Vec<(String, String)> {
        let pattern = self
            .sandbox
            .path()
            .join(".vetra/out/invocations/*.yaml")
            .display()
            .to_string()
            .replace('\\', "/");

        let mut logs = Vec::new();
        if let Ok(paths) = glob::glob(&pattern) {
            for path in paths.flatten() {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string();
                if let Ok(contents) = std::fs::read_to_string(&path) {
                    logs.push((name, contents));
                }
            }
        }
        logs
    }

    /// Tear down the sandbox. Idempotent.
    pub fn tear_down(&mut self) {
        self.sandbox.tear_down();
    }
}
