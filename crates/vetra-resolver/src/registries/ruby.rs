//! RubyGems lookup via the local `gem` command.
//!
//! Unlike the HTTP registries this one shells out: `gem search` goes
//! through whatever ruby toolchain the host has configured, which is
//! also the toolchain the plugin will install under.

use tokio::process::Command;

use crate::errors::ResolveError;

/// Parse `gem search` output, e.g. `demo-gem (1.4.2)`, into the
/// version of the named gem.
pub fn parse_gem_search(output: &str, package: &str) -> Option<String> {
    let token = output
        .lines()
        .find(|line| line.starts_with(package))?
        .split_whitespace()
        .last()?;

    Some(
        token
            .trim_start_matches('(')
            .trim_end_matches(')')
            .to_string(),
    )
}

#[derive(Debug, Clone, Default)]
pub struct GemClient;

impl GemClient {
    pub fn new() -> Self {
        Self
    }

    /// Latest published version of a gem, via an exact-name search.
    pub async fn latest_version(&self, package: &str) -> Result<String, ResolveError> {
        tracing::debug!(package, "querying local gem command for latest version");

        let output = Command::new("ruby")
            .args(["-S", "gem", "search", &format!("^{package}$")])
            .output()
            .await
            .map_err(|e| ResolveError::GemQuery {
                package: package.to_string(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ResolveError::GemQuery {
                package: package.to_string(),
                detail: format!(
                    "gem search exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr)
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_gem_search(&stdout, package).ok_or_else(|| ResolveError::PackageNotFound {
            registry: "rubygems",
            package: package.to_string(),
        })
    }
}
