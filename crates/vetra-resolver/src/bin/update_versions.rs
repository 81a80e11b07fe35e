//! Batch version updater — walks plugin directories and refreshes
//! recorded latest versions.
//!
//! Usage: `update_versions [linters-dir]`, restricted to one plugin
//! when `VETRA_PLUGINS_LINTER` is set.

use vetra_harness_core::trace::init_tracing;
use vetra_resolver::BatchUpdater;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_tracing();

    let linters_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "linters".to_string());
    let only = std::env::var("VETRA_PLUGINS_LINTER").ok();

    let report = match BatchUpdater::new(&linters_dir).run(only.as_deref()).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("batch update failed: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    println!("updated: {:?}", report.updated);
    println!("already current: {:?}", report.already_current);
    for (plugin, error) in &report.failed {
        println!("failed: {plugin}: {error}");
    }

    if report.failed.is_empty() {
        std::process::ExitCode::SUCCESS
    } else {
        std::process::ExitCode::FAILURE
    }
}
