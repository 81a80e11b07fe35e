//! Version resolution dispatch.

use vetra_harness_core::{PluginDefinition, ResolutionStrategy};

use crate::archive;
use crate::errors::ResolveError;
use crate::github::GithubClient;
use crate::registries::{GemClient, NpmClient, PackagistClient, PypiClient};

/// Resolves the latest published version of a plugin by dispatching
/// on its recorded metadata shape.
#[derive(Debug, Clone, Default)]
pub struct VersionResolver {
    github: GithubClient,
    npm: NpmClient,
    pypi: PypiClient,
    packagist: PackagistClient,
    gems: GemClient,
}

impl VersionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a GitHub client pointed at a different endpoint.
    /// Used by tests.
    pub fn with_github(mut self, github: GithubClient) -> Self {
        self.github = github;
        self
    }

    /// Resolve the latest published version for one plugin.
    ///
    /// Any failure is wrapped with the plugin's name and attempted
    /// runtime so batch callers can report it without extra context.
    pub async fn resolve_latest(&self, plugin: &PluginDefinition) -> Result<String, ResolveError> {
        let strategy = ResolutionStrategy::for_plugin(plugin)?;
        let runtime = plugin
            .settings
            .runtime
            .clone()
            .unwrap_or_else(|| "release".to_string());

        self.resolve_strategy(&strategy)
            .await
            .map_err(|source| ResolveError::ForPlugin {
                plugin: plugin.name.clone(),
                runtime,
                source: Box::new(source),
            })
    }

    async fn resolve_strategy(
        &self,
        strategy: &ResolutionStrategy,
    ) -> Result<String, ResolveError> {
        match strategy {
            ResolutionStrategy::SourceRepository { repo } => {
                self.github.latest_release_version(repo).await
            }
            ResolutionStrategy::RunnableArchive { url } => {
                archive::latest_version(&self.github, url).await
            }
            ResolutionStrategy::Ruby { package } => self.gems.latest_version(package).await,
            ResolutionStrategy::Python { package } => self.pypi.latest_version(package).await,
            ResolutionStrategy::Node { package } => self.npm.latest_version(package).await,
            ResolutionStrategy::Php { package } => self.packagist.latest_version(package).await,
        }
    }
}
