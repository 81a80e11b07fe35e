//! Packagist registry client.

use std::collections::HashMap;

use serde::Deserialize;

use crate::errors::ResolveError;

#[derive(Debug, Deserialize)]
struct PackagistResponse {
    packages: HashMap<String, Vec<PackagistVersion>>,
}

#[derive(Debug, Deserialize)]
struct PackagistVersion {
    version: String,
}

#[derive(Debug, Clone)]
pub struct PackagistClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for PackagistClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PackagistClient {
    pub fn new() -> Self {
        Self::with_base_url("https://repo.packagist.org")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Latest published version of a Composer package. Packagist's
    /// p2 endpoint lists versions newest first.
    pub async fn latest_version(&self, package: &str) -> Result<String, ResolveError> {
        let url = format!("{}/p2/{}.json", self.base_url, package);
        tracing::debug!(package, "querying packagist for latest version");

        let response = self.http.get(&url).send().await?;
        match response.status().as_u16() {
            404 => {
                return Err(ResolveError::PackageNotFound {
                    registry: "packagist",
                    package: package.to_string(),
                })
            }
            status if !(200..300).contains(&status) => {
                return Err(ResolveError::RegistryStatus {
                    registry: "packagist",
                    status,
                })
            }
            _ => {}
        }

        let body = response.text().await?;
        let parsed: PackagistResponse =
            serde_json::from_str(&body).map_err(|e| ResolveError::InvalidResponseShape {
                registry: "packagist",
                detail: e.to_string(),
            })?;

        parsed
            .packages
            .get(package)
            .and_then(|versions| versions.first())
            .map(|entry| entry.version.clone())
            .ok_or_else(|| ResolveError::PackageNotFound {
                registry: "packagist",
                package: package.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_listed_version() {
        let body = r#"{"packages":{"org/tool":[{"version":"2.1.0"},{"version":"2.0.0"}]}}"#;
        let parsed: PackagistResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.packages["org/tool"][0].version, "2.1.0");
    }

    #[test]
    fn rejects_malformed_packages_map() {
        assert!(serde_json::from_str::<PackagistResponse>(r#"{"packages":"nope"}"#).is_err());
    }
}
