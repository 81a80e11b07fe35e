//! Runnable-archive strategy: the repository coordinate is embedded
//! in the archive's download URL.

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::ResolveError;
use crate::github::GithubClient;

fn repo_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https://github\.com/([^/]+/[^/]+)/releases/download/").expect("static regex")
    })
}

/// Extract `org/repo` from a release-asset download URL.
pub fn extract_repo(url: &str) -> Result<&str, ResolveError> {
    repo_regex()
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ResolveError::InvalidArchiveUrl {
            url: url.to_string(),
        })
}

/// Resolve the latest version of the repository an archive URL
/// points into.
pub async fn latest_version(github: &GithubClient, url: &str) -> Result<String, ResolveError> {
    let repo = extract_repo(url)?;
    github.latest_release_version(repo).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_org_and_repo() {
        let url = "https://github.com/demo-org/demo-tool/releases/download/v1.0.0/tool.tar.gz";
        assert_eq!(extract_repo(url).unwrap(), "demo-org/demo-tool");
    }

    #[test]
    fn rejects_non_release_urls() {
        let urls = [
            "https://github.com/demo-org/demo-tool/archive/main.tar.gz",
            "https://example.com/demo-org/demo-tool/releases/download/v1/tool.jar",
            "not a url",
        ];
        for url in urls {
            assert!(matches!(
                extract_repo(url),
                Err(ResolveError::InvalidArchiveUrl { .. })
            ));
        }
    }
}
