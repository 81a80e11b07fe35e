//! Harness error types, one enum per lifecycle stage.
//!
//! Provisioning and launch failures are fatal for a single test
//! case. A subprocess that starts, exits non-zero, and prints to
//! stderr is not an error at this layer — that outcome is captured
//! as data in a `RunResult`.

use std::path::PathBuf;

/// Errors while provisioning or configuring a sandbox.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Fixture input does not exist: {path}")]
    FixtureMissing { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to initialize sandbox repository: {0}")]
    Git(#[from] git2::Error),
}

/// Errors launching the external analysis command. Only a failure to
/// start the process lands here.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: PathBuf,
        source: std::io::Error,
    },
}

/// Errors while selecting versions for a target.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Failed to read snapshots directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Version override 'Latest' requires a resolved upstream version for '{plugin}'")]
    LatestUnresolved { plugin: String },
}

/// Errors while resolving, reading, or comparing snapshot files.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Snapshot mismatch at {path}\n--- expected ---\n{expected}\n--- actual ---\n{actual}")]
    Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}
