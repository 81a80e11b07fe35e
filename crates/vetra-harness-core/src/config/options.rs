//! Harness options — the explicit configuration value threaded into
//! the matrix runner at construction.

use std::path::PathBuf;

/// Which version(s) of a plugin a test run should exercise.
///
/// Resolved into a concrete ordered set of version strings by the
/// version policy before any sandbox is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// The plugin's recorded known-good version.
    KnownGoodVersion,
    /// The latest version published upstream.
    Latest,
    /// Every version with a recorded snapshot.
    Snapshots,
    /// A single explicit version string.
    Explicit(String),
}

impl VersionSpec {
    /// Parse an override string. Empty input means no override.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" => None,
            "KnownGoodVersion" => Some(Self::KnownGoodVersion),
            "Latest" => Some(Self::Latest),
            "Snapshots" => Some(Self::Snapshots),
            other => Some(Self::Explicit(other.to_string())),
        }
    }
}

/// Options controlling a harness run.
#[derive(Debug, Clone)]
pub struct HarnessOptions {
    /// Version override for the plugin under test.
    pub linter_version: Option<VersionSpec>,
    /// Leave sandbox directories in place for manual inspection.
    pub sandbox_debug: bool,
    /// Compare output against the known-good snapshot regardless of
    /// the version under test.
    pub test_against_known_good: bool,
    /// Emit captured output even for passing cases.
    pub always_log: bool,
    /// Program to invoke as the external analysis command.
    pub tool_bin: PathBuf,
    /// Directory prepended to PATH so a locally built tool wins over
    /// an installed one.
    pub tool_path: Option<PathBuf>,
    /// Log level requested from the external tool.
    pub tool_log: String,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            linter_version: None,
            sandbox_debug: false,
            test_against_known_good: false,
            always_log: false,
            tool_bin: PathBuf::from("vetra"),
            tool_path: None,
            tool_log: "debug".to_string(),
        }
    }
}

impl HarnessOptions {
    /// Build options from the process environment. This is the only
    /// place the harness reads environment variables.
    pub fn from_env() -> Self {
        let env = |key: &str| std::env::var(key).unwrap_or_default();

        let options = Self {
            linter_version: VersionSpec::parse(&env("VETRA_PLUGINS_LINTER_VERSION")),
            sandbox_debug: !env("VETRA_PLUGINS_SANDBOX_DEBUG").is_empty(),
            test_against_known_good: !env("VETRA_PLUGINS_TEST_AGAINST_KNOWN_GOOD_VERSION")
                .is_empty(),
            always_log: !env("VETRA_PLUGINS_ALWAYS_LOG").is_empty(),
            tool_bin: PathBuf::from("vetra"),
            tool_path: match env("VETRA_PLUGINS_TOOL_PATH").as_str() {
                "" => None,
                dir => Some(PathBuf::from(dir)),
            },
            tool_log: match env("VETRA_LOG").as_str() {
                "" => "debug".to_string(),
                level => level.to_string(),
            },
        };
        tracing::debug!(?options, "harness options from environment");
        options
    }

    /// Replace the tool binary, keeping everything else. Used by
    /// tests to point the driver at a stub command.
    pub fn with_tool_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.tool_bin = bin.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_is_none() {
        assert_eq!(VersionSpec::parse(""), None);
    }

    #[test]
    fn parse_keywords() {
        assert_eq!(
            VersionSpec::parse("KnownGoodVersion"),
            Some(VersionSpec::KnownGoodVersion)
        );
        assert_eq!(VersionSpec::parse("Latest"), Some(VersionSpec::Latest));
        assert_eq!(
            VersionSpec::parse("Snapshots"),
            Some(VersionSpec::Snapshots)
        );
    }

    #[test]
    fn parse_explicit_version() {
        assert_eq!(
            VersionSpec::parse("1.2.3"),
            Some(VersionSpec::Explicit("1.2.3".to_string()))
        );
    }
}
