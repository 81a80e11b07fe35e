//! npm registry client.

use serde::Deserialize;

use crate::errors::ResolveError;

#[derive(Debug, Deserialize)]
struct NpmDistTag {
    version: String,
}

#[derive(Debug, Clone)]
pub struct NpmClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for NpmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NpmClient {
    pub fn new() -> Self {
        Self::with_base_url("https://registry.npmjs.org")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Latest published version of an npm package, via the `latest`
    /// dist-tag endpoint.
    pub async fn latest_version(&self, package: &str) -> Result<String, ResolveError> {
        let url = format!("{}/{}/latest", self.base_url, package);
        tracing::debug!(package, "querying npm for latest version");

        let response = self.http.get(&url).send().await?;
        match response.status().as_u16() {
            404 => {
                return Err(ResolveError::PackageNotFound {
                    registry: "npm",
                    package: package.to_string(),
                })
            }
            status if !(200..300).contains(&status) => {
                return Err(ResolveError::RegistryStatus {
                    registry: "npm",
                    status,
                })
            }
            _ => {}
        }

        let body = response.text().await?;
        let tag: NpmDistTag =
            serde_json::from_str(&body).map_err(|e| ResolveError::InvalidResponseShape {
                registry: "npm",
                detail: e.to_string(),
            })?;

        Ok(tag.version)
    }
}
