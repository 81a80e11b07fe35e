//! Resolution strategy — a closed variant type over the ways a
//! plugin's latest version can be looked up. Each variant carries
//! exactly the fields its strategy needs, so dispatch is exhaustive
//! and shape errors surface at derivation time, not mid-fetch.

use super::definition::PluginDefinition;
use crate::errors::PluginConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// Latest tagged release of a source repository (`org/repo`).
    SourceRepository { repo: String },
    /// Repository embedded in a runnable-archive download URL.
    RunnableArchive { url: String },
    /// RubyGems, queried through the local `gem` command.
    Ruby { package: String },
    /// PyPI JSON API.
    Python { package: String },
    /// npm registry.
    Node { package: String },
    /// Packagist.
    Php { package: String },
}

impl ResolutionStrategy {
    /// Derive the strategy for a plugin from its recorded metadata.
    ///
    /// Dispatch order: a declared `releases` list wins (its first
    /// entry's repository is used), then archive runtimes, then
    /// package runtimes.
    pub fn for_plugin(plugin: &PluginDefinition) -> Result<Self, PluginConfigError> {
        if let Some(release) = plugin.settings.releases.first() {
            let coordinate = plugin.releases.get(release).ok_or_else(|| {
                PluginConfigError::MissingReleaseEntry {
                    plugin: plugin.name.clone(),
                    release: release.clone(),
                }
            })?;
            return Ok(Self::SourceRepository {
                repo: coordinate.github.clone(),
            });
        }

        let runtime = match plugin.settings.runtime.as_deref() {
            Some(runtime) => runtime,
            None => {
                return Err(PluginConfigError::NoStrategy {
                    plugin: plugin.name.clone(),
                })
            }
        };

        let archive_url = plugin.settings.runnable_archive_url.clone();
        let package = |runtime: &str| {
            plugin.settings.package.clone().ok_or_else(|| {
                PluginConfigError::MissingPackage {
                    plugin: plugin.name.clone(),
                    runtime: runtime.to_string(),
                }
            })
        };

        match runtime {
            "java" => {
                let url = archive_url.ok_or_else(|| PluginConfigError::MissingArchiveUrl {
                    plugin: plugin.name.clone(),
                    runtime: runtime.to_string(),
                })?;
                Ok(Self::RunnableArchive { url })
            }
            // php distributes both as runnable archives and as
            // Packagist packages; the archive URL takes precedence.
            "php" => match archive_url {
                Some(url) => Ok(Self::RunnableArchive { url }),
                None => Ok(Self::Php {
                    package: package(runtime)?,
                }),
            },
            "ruby" => Ok(Self::Ruby {
                package: package(runtime)?,
            }),
            "python" => Ok(Self::Python {
                package: package(runtime)?,
            }),
            "node" => Ok(Self::Node {
                package: package(runtime)?,
            }),
            other => Err(PluginConfigError::UnknownRuntime {
                plugin: plugin.name.clone(),
                runtime: other.to_string(),
            }),
        }
    }
}
