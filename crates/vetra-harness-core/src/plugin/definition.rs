//! `plugin.toml` deserialization and the immutable per-plugin view.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::errors::PluginConfigError;

/// Top level of a `plugin.toml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginFile {
    pub plugins: PluginsSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PluginsSection {
    /// Named release coordinates, e.g. `[plugins.releases.shellcheck]`.
    #[serde(default)]
    pub releases: BTreeMap<String, ReleaseSettings>,
    /// Plugin definitions keyed by plugin name.
    #[serde(default)]
    pub definitions: BTreeMap<String, PluginSettings>,
}

/// A release coordinate: where tagged releases of a tool live.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseSettings {
    /// Repository in `org/repo` form.
    pub github: String,
}

/// One plugin's recorded settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginSettings {
    /// Last version confirmed to pass the test suite.
    pub known_good_version: String,
    /// Latest version seen upstream. Informational only.
    pub latest_version: Option<String>,
    /// Release names, most recent first. Ordering is a caller
    /// invariant, not validated here.
    #[serde(default)]
    pub releases: Vec<String>,
    /// Runtime the plugin runs under (`node`, `python`, ...).
    pub runtime: Option<String>,
    /// Package name within the runtime's registry.
    pub package: Option<String>,
    /// Download URL for runnable-archive distributions.
    pub runnable_archive_url: Option<String>,
}

impl PluginFile {
    /// Load and parse a `plugin.toml`.
    pub fn load(path: &Path) -> Result<Self, PluginConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| PluginConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| PluginConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Extract the definition for one plugin by name.
    pub fn definition(
        &self,
        name: &str,
        path: &Path,
    ) -> Result<PluginDefinition, PluginConfigError> {
        let settings = self.plugins.definitions.get(name).cloned().ok_or_else(|| {
            PluginConfigError::MissingDefinition {
                plugin: name.to_string(),
                path: path.to_path_buf(),
            }
        })?;

        Ok(PluginDefinition {
            name: name.to_string(),
            settings,
            releases: self.plugins.releases.clone(),
        })
    }
}

/// Immutable per-plugin view: one definition plus the release table
/// it may reference. Loaded once per test run.
#[derive(Debug, Clone)]
pub struct PluginDefinition {
    pub name: String,
    pub settings: PluginSettings,
    pub releases: BTreeMap<String, ReleaseSettings>,
}

impl PluginDefinition {
    /// Convenience loader: read `<plugin_dir>/plugin.toml` and pull
    /// out the definition matching the directory's plugin name.
    pub fn load(plugin_dir: &Path, name: &str) -> Result<Self, PluginConfigError> {
        let path = plugin_dir.join("plugin.toml");
        PluginFile::load(&path)?.definition(name, &path)
    }

    pub fn known_good_version(&self) -> &str {
        &self.settings.known_good_version
    }
}
