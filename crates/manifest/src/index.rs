use crate::document::{ForksDocument, RawBuild, SourceDocument};
use crate::error::{DocumentKind, ManifestError, Result};
use crate::fetch::DocumentFetcher;
use crate::record::{BuildDiff, BuildRecord};
use crate::version::{version_key, BuildVersion};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Fork child version key to the key of the build its history branches from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForkMap {
    parents: BTreeMap<u64, u64>,
}

impl ForkMap {
    /// Build from `child -> parent` version strings.
    pub fn from_versions<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut parents = BTreeMap::new();
        for (child, parent) in pairs {
            parents.insert(version_key(child)?, version_key(parent)?);
        }
        Ok(Self { parents })
    }

    #[must_use]
    pub fn parent_of(&self, child: u64) -> Option<u64> {
        self.parents.get(&child).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Immutable, version-ordered history of builds plus the fork map.
#[derive(Debug, Clone, Default)]
pub struct BuildIndex {
    pub(crate) builds: BTreeMap<u64, BuildRecord>,
    pub(crate) forks: ForkMap,
}

impl BuildIndex {
    /// Index `records` by version key. A later record with the same key replaces an earlier one.
    pub fn new(records: impl IntoIterator<Item = BuildRecord>, forks: ForkMap) -> Self {
        let mut builds = BTreeMap::new();
        for record in records {
            if let Some(previous) = builds.insert(record.version.key(), record) {
                log::debug!("Build {} replaced by a later manifest entry", previous.version);
            }
        }
        Self { builds, forks }
    }

    /// Fetch and index both documents. Any failure is fatal; nothing is retried.
    pub fn load(
        fetcher: &dyn DocumentFetcher,
        source_location: &str,
        forks_location: &str,
    ) -> Result<Self> {
        log::debug!("Loading source manifest from {source_location}");
        let source = fetcher.fetch(DocumentKind::Source, source_location)?;
        log::debug!("Loading forked version manifest from {forks_location}");
        let forks = fetcher.fetch(DocumentKind::Forks, forks_location)?;

        let index = Self::from_documents(&source, &forks)?;
        log::info!(
            "Loaded {} builds and {} forks",
            index.builds.len(),
            index.forks.len()
        );
        Ok(index)
    }

    /// Parse the source manifest and forks documents.
    pub fn from_documents(source: &str, forks: &str) -> Result<Self> {
        let source: SourceDocument = parse_document(DocumentKind::Source, source)?;
        let forks: ForksDocument = parse_document(DocumentKind::Forks, forks)?;

        let records = source
            .manifest
            .into_iter()
            .map(build_record)
            .collect::<Result<Vec<_>>>()?;
        let forks = ForkMap::from_versions(
            forks
                .forks
                .iter()
                .map(|(child, parent)| (child.as_str(), parent.as_str())),
        )?;

        Ok(Self::new(records, forks))
    }

    /// Build versions in ascending key order.
    #[must_use]
    pub fn list_builds(&self) -> Vec<&str> {
        self.builds
            .values()
            .map(|record| record.version.as_str())
            .collect()
    }

    /// Records in ascending key order.
    pub fn records(&self) -> impl Iterator<Item = &BuildRecord> {
        self.builds.values()
    }

    pub fn get_record(&self, version: &str) -> Result<&BuildRecord> {
        let key = version_key(version)?;
        self.builds
            .get(&key)
            .ok_or_else(|| ManifestError::UnknownBuild(version.to_string()))
    }

    #[must_use]
    pub fn forks(&self) -> &ForkMap {
        &self.forks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.builds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }
}

fn parse_document<T: DeserializeOwned>(kind: DocumentKind, body: &str) -> Result<T> {
    if body.trim().is_empty() {
        return Err(ManifestError::NotFound {
            kind,
            location: "<empty document>".to_string(),
        });
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|source| ManifestError::Json { kind, source })?;
    serde_json::from_value(value).map_err(|err| ManifestError::InvalidDocument {
        kind,
        reason: err.to_string(),
    })
}

fn build_record(raw: RawBuild) -> Result<BuildRecord> {
    let version = BuildVersion::parse(&raw.build)?;
    let files = raw.files.unwrap_or_default();
    Ok(BuildRecord {
        version,
        parent: raw.parent,
        modules: raw.modules,
        diff: BuildDiff {
            added: files.added,
            modified: files.modified,
            removed: files.removed.unwrap_or_default().into_iter().collect(),
        },
    })
}
