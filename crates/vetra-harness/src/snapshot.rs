//! Snapshot matching with record-then-compare semantics.

use std::path::Path;

use tracing::info;

use vetra_harness_core::NormalizedResults;

use crate::errors::SnapshotError;

/// What a comparison did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// Stored snapshot existed and matched.
    Matched,
    /// No snapshot existed; the result was recorded.
    Written,
}

/// Serialize normalized results into snapshot file content.
pub fn serialize_results(results: &NormalizedResults) -> Result<String, SnapshotError> {
    let mut content = serde_json::to_string_pretty(results)?;
    content.push('\n');
    Ok(content)
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> SnapshotError + '_ {
    move |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Compare snapshot content against the stored file.
///
/// On first run for a key the content is written instead of failing.
/// On mismatch both values are surfaced so a human can accept or
/// reject the diff; accepting means deleting or overwriting the
/// stored file.
pub fn match_content(path: &Path, actual: &str) -> Result<SnapshotOutcome, SnapshotError> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        std::fs::write(path, actual).map_err(io_err(path))?;
        info!(snapshot = %path.display(), "recorded new snapshot");
        return Ok(SnapshotOutcome::Written);
    }

    let expected = std::fs::read_to_string(path).map_err(io_err(path))?;
    if expected == actual {
        return Ok(SnapshotOutcome::Matched);
    }

    Err(SnapshotError::Mismatch {
        path: path.to_path_buf(),
        expected,
        actual: actual.to_string(),
    })
}

/// Compare normalized results against the snapshot at `path`.
pub fn match_snapshot(
    path: &Path,
    results: &NormalizedResults,
) -> Result<SnapshotOutcome, SnapshotError> {
    let actual = serialize_results(results)?;
    match_content(path, &actual)
}
