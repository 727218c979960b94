use crate::error::{DocumentKind, ManifestError, Result};
use std::path::Path;

/// Retrieves the raw body of a manifest document.
///
/// Implementations decide which locations they understand (URLs, paths). Retries and timeouts
/// are theirs to apply; the index never retries.
pub trait DocumentFetcher {
    fn fetch(&self, kind: DocumentKind, location: &str) -> Result<String>;
}

/// Reads documents from the local filesystem. Accepts plain paths and `file://` URLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

impl DocumentFetcher for FileFetcher {
    fn fetch(&self, kind: DocumentKind, location: &str) -> Result<String> {
        let path = Path::new(location.strip_prefix("file://").unwrap_or(location));
        log::debug!("Reading {kind} manifest from {}", path.display());

        std::fs::read_to_string(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => ManifestError::NotFound {
                kind,
                location: location.to_string(),
            },
            _ => ManifestError::Fetch {
                kind,
                location: location.to_string(),
                message: err.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_paths_and_file_urls() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("forks.json");
        std::fs::write(&path, r#"{"forks":{}}"#).unwrap();

        let plain = FileFetcher
            .fetch(DocumentKind::Forks, path.to_str().unwrap())
            .unwrap();
        let url = FileFetcher
            .fetch(DocumentKind::Forks, &format!("file://{}", path.display()))
            .unwrap();
        assert_eq!(plain, url);
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("builds.json");
        let err = FileFetcher
            .fetch(DocumentKind::Source, missing.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }
}
