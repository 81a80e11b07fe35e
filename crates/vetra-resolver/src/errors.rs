//! Resolution error types.
//! One enum covering every strategy; failures are wrapped with the
//! plugin name and attempted runtime at the dispatch layer.

use vetra_harness_core::PluginConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Config(#[from] PluginConfigError),

    #[error("Not a recognizable release-archive URL: {url}")]
    InvalidArchiveUrl { url: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{registry} request failed with status {status}")]
    RegistryStatus { registry: &'static str, status: u16 },

    #[error("No release tag found for {repo}")]
    NoReleaseTag { repo: String },

    #[error("No version found in release tag '{tag}'")]
    VersionNotFound { tag: String },

    #[error("Invalid {registry} response: {detail}")]
    InvalidResponseShape {
        registry: &'static str,
        detail: String,
    },

    #[error("Package '{package}' not found on {registry}")]
    PackageNotFound {
        registry: &'static str,
        package: String,
    },

    #[error("gem query for '{package}' failed: {detail}")]
    GemQuery { package: String, detail: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch latest version for {runtime}/{plugin}: {source}")]
    ForPlugin {
        plugin: String,
        runtime: String,
        #[source]
        source: Box<ResolveError>,
    },
}
