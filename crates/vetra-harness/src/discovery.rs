//! Target discovery — scans a plugin's fixtures directory for input
//! entries and groups them into named test targets.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

pub const FIXTURES_DIR: &str = "fixtures";
pub const SNAPSHOTS_DIR: &str = "__snapshots__";

/// One fixture input entry: a logical prefix plus the file or
/// directory name it was discovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureInput {
    pub prefix: String,
    pub input: String,
}

/// A fixture group scheduled into the matrix: an input plus the
/// versions it will be exercised against.
#[derive(Debug, Clone)]
pub struct TestTarget {
    pub prefix: String,
    pub input: String,
    pub versions: Vec<String>,
}

fn input_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<prefix>.+)\.in").expect("static regex"))
}

/// Scan a fixtures directory for input entries.
///
/// The listing is sorted first, so results are deterministic for a
/// given directory. Entries whose name matches `<prefix>.in…` become
/// targets keyed by prefix; both files and directories qualify.
/// Snapshot storage and dotfiles are skipped. When two entries share
/// a prefix the last-sorted name wins; that tie-break is kept from
/// the original harness behavior and warned about, since it usually
/// means a fixture was added with a clashing name.
pub fn discover_inputs(fixtures_dir: &Path) -> std::io::Result<Vec<FixtureInput>> {
    let mut names: Vec<String> = std::fs::read_dir(fixtures_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();

    let mut inputs: BTreeMap<String, FixtureInput> = BTreeMap::new();

    for name in names {
        if name.contains(SNAPSHOTS_DIR) || name.starts_with('.') {
            continue;
        }

        let prefix = match input_regex().captures(&name) {
            Some(captures) => captures["prefix"].to_string(),
            None => continue,
        };

        if let Some(previous) = inputs.get(&prefix) {
            warn!(
                prefix = %prefix,
                kept = %name,
                replaced = %previous.input,
                "duplicate fixture prefix, last-sorted entry wins"
            );
        }

        inputs.insert(prefix.clone(), FixtureInput { prefix, input: name });
    }

    Ok(inputs.into_values().collect())
}
