//! PyPI registry client.

use serde::Deserialize;

use crate::errors::ResolveError;

#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: PypiInfo,
}

#[derive(Debug, Deserialize)]
struct PypiInfo {
    version: String,
}

#[derive(Debug, Clone)]
pub struct PypiClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for PypiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PypiClient {
    pub fn new() -> Self {
        Self::with_base_url("https://pypi.org")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Latest published version of a pip package.
    pub async fn latest_version(&self, package: &str) -> Result<String, ResolveError> {
        let url = format!("{}/pypi/{}/json", self.base_url, package);
        tracing::debug!(package, "querying pypi for latest version");

        let response = self.http.get(&url).send().await?;
        match response.status().as_u16() {
            404 => {
                return Err(ResolveError::PackageNotFound {
                    registry: "pypi",
                    package: package.to_string(),
                })
            }
            status if !(200..300).contains(&status) => {
                return Err(ResolveError::RegistryStatus {
                    registry: "pypi",
                    status,
                })
            }
            _ => {}
        }

        let body = response.text().await?;
        let parsed: PypiResponse =
            serde_json::from_str(&body).map_err(|e| ResolveError::InvalidResponseShape {
                registry: "pypi",
                detail: e.to_string(),
            })?;

        Ok(parsed.info.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_info_version() {
        let parsed: PypiResponse = serde_json::from_str(
            r#"{"info":{"name":"demo","version":"0.9.1"},"releases":{}}"#,
        )
        .unwrap();
        assert_eq!(parsed.info.version, "0.9.1");
    }

    #[test]
    fn rejects_payload_without_info_version() {
        assert!(serde_json::from_str::<PypiResponse>(r#"{"info":{"name":"demo"}}"#).is_err());
    }
}
