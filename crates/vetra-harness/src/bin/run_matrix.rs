//! Verification matrix entry point.
//!
//! Usage: `run_matrix <plugin-dir> <plugin-name>`. Harness behavior
//! is controlled through the `VETRA_PLUGINS_*` environment variables.

use std::path::PathBuf;

use vetra_harness::matrix::{CaseStatus, MatrixRunner};
use vetra_harness_core::trace::init_tracing;
use vetra_harness_core::HarnessOptions;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let (Some(plugin_dir), Some(plugin_name)) = (args.next(), args.next()) else {
        eprintln!("usage: run_matrix <plugin-dir> <plugin-name>");
        return std::process::ExitCode::FAILURE;
    };

    let runner = MatrixRunner::new(
        &PathBuf::from(plugin_dir),
        &plugin_name,
        HarnessOptions::from_env(),
    );
    let report = runner.run().await;

    if report.skipped {
        println!("{}: skipped on this platform", report.plugin);
        return std::process::ExitCode::SUCCESS;
    }

    for case in &report.cases {
        let verdict = match &case.status {
            CaseStatus::Passed => "ok".to_string(),
            CaseStatus::SnapshotWritten => "snapshot written".to_string(),
            CaseStatus::Failed(message) => format!("FAILED: {message}"),
        };
        println!("{} v{}: {verdict}", case.target, case.version);
    }

    if report.all_passed() {
        std::process::ExitCode::SUCCESS
    } else {
        std::process::ExitCode::FAILURE
    }
}
