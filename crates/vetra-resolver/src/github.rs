//! GitHub latest-release lookup — the source-repository strategy.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::errors::ResolveError;

const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "vetra-plugins-harness";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\d+\.\d+").expect("static regex"))
}

/// Extract a three-component semantic-version substring from a
/// release tag, e.g. `"v1.2.3-rc"` yields `"1.2.3"`.
pub fn extract_version(tag: &str) -> Option<&str> {
    version_regex().find(tag).map(|m| m.as_str())
}

#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: Option<String>,
}

/// Client for the GitHub "latest release" endpoint.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GithubClient {
    pub fn new() -> Self {
        Self::with_base_url("https://api.github.com")
    }

    /// Point the client at a different endpoint. Used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Resolve the latest released version of `repo` (`org/repo`).
    pub async fn latest_release_version(&self, repo: &str) -> Result<String, ResolveError> {
        let url = format!("{}/repos/{}/releases/latest", self.base_url, repo);
        tracing::debug!(repo, "querying github for latest release");

        let response = self
            .http
            .get(&url)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolveError::RegistryStatus {
                registry: "github",
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let release: LatestRelease =
            serde_json::from_str(&body).map_err(|e| ResolveError::InvalidResponseShape {
                registry: "github",
                detail: e.to_string(),
            })?;

        let tag = match release.tag_name {
            Some(tag) if !tag.is_empty() => tag,
            _ => {
                return Err(ResolveError::NoReleaseTag {
                    repo: repo.to_string(),
                })
            }
        };

        match extract_version(&tag) {
            Some(version) => Ok(version.to_string()),
            None => Err(ResolveError::VersionNotFound { tag }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_version_from_plain_tag() {
        assert_eq!(extract_version("1.2.3"), Some("1.2.3"));
    }

    #[test]
    fn extracts_version_from_prefixed_tag() {
        assert_eq!(extract_version("v10.20.30"), Some("10.20.30"));
        assert_eq!(extract_version("release-2.0.1-hotfix"), Some("2.0.1"));
    }

    #[test]
    fn tag_without_three_components_yields_none() {
        assert_eq!(extract_version("v1.2"), None);
        assert_eq!(extract_version("nightly"), None);
    }
}
