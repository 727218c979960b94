use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;
use winter_manifest::{DocumentFetcher, DocumentKind, FileFetcher, ManifestError};

/// Fetches manifests over HTTP(S), falling back to the filesystem for other locations.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("winter-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl DocumentFetcher for HttpFetcher {
    fn fetch(&self, kind: DocumentKind, location: &str) -> winter_manifest::Result<String> {
        if !is_http(location) {
            return FileFetcher.fetch(kind, location);
        }

        log::debug!("GET {location}");
        let fetch_error = |message: String| ManifestError::Fetch {
            kind,
            location: location.to_string(),
            message,
        };

        let response = self
            .client
            .get(location)
            .send()
            .map_err(|err| fetch_error(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ManifestError::NotFound {
                kind,
                location: location.to_string(),
            });
        }
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP status {status}")));
        }

        response.text().map_err(|err| fetch_error(err.to_string()))
    }
}

fn is_http(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_schemes_go_over_the_network() {
        assert!(is_http(
            "https://raw.githubusercontent.com/wintercms/meta/master/manifest/builds.json"
        ));
        assert!(is_http("HTTP://localhost/builds.json"));
        assert!(!is_http("file:///tmp/builds.json"));
        assert!(!is_http("manifests/builds.json"));
    }

    #[test]
    fn local_locations_are_read_from_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("forks.json");
        std::fs::write(&path, r#"{"forks":{}}"#).unwrap();

        let fetcher = HttpFetcher::new(Duration::from_secs(1)).unwrap();
        let body = fetcher
            .fetch(DocumentKind::Forks, path.to_str().unwrap())
            .unwrap();
        assert_eq!(body, r#"{"forks":{}}"#);
    }
}
