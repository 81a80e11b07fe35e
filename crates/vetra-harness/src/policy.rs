//! Version policy — decides which versions a target runs against.
//!
//! Precedence, highest first: the known-good test flag, then an
//! explicit override, then the versions already recorded in snapshot
//! filenames, then a first-time-recording fallback to the known-good
//! version. CI pins a single version for speed; unattended local
//! runs get full historical coverage without manual enumeration.

use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;
use tracing::warn;

use vetra_harness_core::{HarnessOptions, PluginDefinition, VersionSpec};

use crate::errors::PolicyError;

fn snapshot_regex(prefix: &str) -> Regex {
    Regex::new(&format!(
        r"^{}(_v(?P<version>[^_]+))?\.shot$",
        regex::escape(prefix)
    ))
    .expect("escaped prefix regex")
}

/// Select the ordered set of versions a (plugin, target) pair must
/// be exercised against.
///
/// `resolved_latest` must be supplied when the override is
/// [`VersionSpec::Latest`]; the policy itself never touches the
/// network. Creates the snapshots directory when missing so a
/// first-time run can record into it.
pub fn select_versions(
    plugin: &PluginDefinition,
    options: &HarnessOptions,
    resolved_latest: Option<&str>,
    snapshots_dir: &Path,
    prefix: &str,
) -> Result<Vec<String>, PolicyError> {
    let known_good = plugin.known_good_version().to_string();

    if options.test_against_known_good
        || options.linter_version == Some(VersionSpec::KnownGoodVersion)
    {
        return Ok(vec![known_good]);
    }

    match &options.linter_version {
        Some(VersionSpec::Explicit(version)) => return Ok(vec![version.clone()]),
        Some(VersionSpec::Latest) => {
            let latest = resolved_latest.ok_or_else(|| PolicyError::LatestUnresolved {
                plugin: plugin.name.clone(),
            })?;
            return Ok(vec![latest.to_string()]);
        }
        // Snapshots is the same as no override: run every recorded
        // version.
        Some(VersionSpec::Snapshots) | None => {}
        Some(VersionSpec::KnownGoodVersion) => unreachable!("handled above"),
    }

    if !snapshots_dir.exists() {
        std::fs::create_dir_all(snapshots_dir)?;
    }

    let pattern = snapshot_regex(prefix);
    let mut versions = BTreeSet::new();
    let mut match_exists = false;

    for entry in std::fs::read_dir(snapshots_dir)? {
        let entry = entry?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };

        if let Some(captures) = pattern.captures(&name) {
            match_exists = true;
            if let Some(version) = captures.name("version") {
                versions.insert(version.as_str().to_string());
            }
        }
    }

    if !match_exists {
        warn!(
            plugin = %plugin.name,
            prefix = %prefix,
            version = %known_good,
            "no snapshots recorded for this target yet, running against the known-good version"
        );
        return Ok(vec![known_good]);
    }

    Ok(versions.into_iter().collect())
}
