//! Batch version-update driver.
//!
//! Walks every plugin directory, resolves the latest upstream
//! version, and refreshes the recorded `latest_version` field.
//! A single plugin's failure never aborts the batch.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use vetra_harness_core::PluginDefinition;

use crate::errors::ResolveError;
use crate::resolver::VersionResolver;

/// Three-bucket outcome of a batch run.
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// Plugins whose recorded latest_version was refreshed.
    pub updated: Vec<String>,
    /// Plugins already recording the upstream latest version.
    pub already_current: Vec<String>,
    /// Plugins that could not be resolved, with the failure message.
    pub failed: Vec<(String, String)>,
}

fn latest_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(latest_version\s*=\s*)"[^"]*""#).expect("static regex"))
}

fn known_good_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(known_good_version\s*=\s*)"[^"]*""#).expect("static regex"))
}

/// Rewrite version fields in a `plugin.toml` source string by
/// targeted substitution, leaving comments and layout intact.
/// `known_good_version` is only touched when the new version has
/// been verified against the test suite.
pub fn rewrite_versions(toml_src: &str, latest: &str, update_known_good: bool) -> String {
    let replacement = format!("${{1}}\"{latest}\"");
    let rewritten = latest_version_regex().replace(toml_src, replacement.as_str());

    if update_known_good {
        known_good_version_regex()
            .replace(&rewritten, replacement.as_str())
            .into_owned()
    } else {
        rewritten.into_owned()
    }
}

/// Walks plugin directories and refreshes recorded versions.
#[derive(Debug)]
pub struct BatchUpdater {
    resolver: VersionResolver,
    linters_dir: PathBuf,
}

impl BatchUpdater {
    pub fn new(linters_dir: impl Into<PathBuf>) -> Self {
        Self {
            resolver: VersionResolver::new(),
            linters_dir: linters_dir.into(),
        }
    }

    pub fn with_resolver(mut self, resolver: VersionResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// List plugin directories, sorted. When `only` is set, restrict
    /// the batch to that single plugin.
    fn plugin_names(&self, only: Option<&str>) -> std::io::Result<Vec<String>> {
        if let Some(name) = only {
            return Ok(vec![name.to_string()]);
        }

        let mut names: Vec<String> = std::fs::read_dir(&self.linters_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Resolve every plugin and refresh `latest_version` where it
    /// moved. Resolution failures land in the `failed` bucket and
    /// the batch continues.
    pub async fn run(&self, only: Option<&str>) -> Result<UpdateReport, ResolveError> {
        let mut report = UpdateReport::default();

        let names = self.plugin_names(only).map_err(|source| ResolveError::Io {
            path: self.linters_dir.display().to_string(),
            source,
        })?;

        for name in names {
            let plugin_dir = self.linters_dir.join(&name);

            match self.update_one(&plugin_dir, &name).await {
                Ok(Some(version)) => {
                    info!(plugin = %name, %version, "recorded new latest version");
                    report.updated.push(name);
                }
                Ok(None) => report.already_current.push(name),
                Err(e) => {
                    warn!(plugin = %name, error = %e, "skipping plugin after resolution failure");
                    report.failed.push((name, e.to_string()));
                }
            }
        }

        Ok(report)
    }

    /// Returns the new version when the plugin moved, `None` when it
    /// was already current.
    async fn update_one(
        &self,
        plugin_dir: &Path,
        name: &str,
    ) -> Result<Option<String>, ResolveError> {
        let plugin = PluginDefinition::load(plugin_dir, name)?;
        let latest = self.resolver.resolve_latest(&plugin).await?;

        let recorded = plugin
            .settings
            .latest_version
            .as_deref()
            .unwrap_or(plugin.known_good_version());
        if recorded == latest {
            return Ok(None);
        }

        let toml_path = plugin_dir.join("plugin.toml");
        let contents = std::fs::read_to_string(&toml_path).map_err(|source| ResolveError::Io {
            path: toml_path.display().to_string(),
            source,
        })?;
        let rewritten = rewrite_versions(&contents, &latest, false);
        std::fs::write(&toml_path, rewritten).map_err(|source| ResolveError::Io {
            path: toml_path.display().to_string(),
            source,
        })?;

        Ok(Some(latest))
    }
}
