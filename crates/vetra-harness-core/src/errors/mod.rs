//! Plugin metadata error types.
//! One error enum covering loading and strategy derivation.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PluginConfigError {
    // Loading
    #[error("Failed to read plugin file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse plugin file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("No definition for plugin '{plugin}' in {path}")]
    MissingDefinition { plugin: String, path: PathBuf },

    // Strategy derivation
    #[error("Plugin '{plugin}' lists release '{release}' but no such release is declared")]
    MissingReleaseEntry { plugin: String, release: String },

    #[error("Plugin '{plugin}' declares runtime '{runtime}' but no package")]
    MissingPackage { plugin: String, runtime: String },

    #[error("Plugin '{plugin}' declares runtime '{runtime}' but no runnable_archive_url")]
    MissingArchiveUrl { plugin: String, runtime: String },

    #[error("Unknown runtime '{runtime}' for plugin '{plugin}'")]
    UnknownRuntime { plugin: String, runtime: String },

    #[error("No resolution strategy applies to plugin '{plugin}'")]
    NoStrategy { plugin: String },
}
