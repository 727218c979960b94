use crate::version::BuildVersion;
use std::collections::{BTreeMap, BTreeSet};

/// Expected `/modules/<module>/...` path to content hash.
pub type FileState = BTreeMap<String, String>;

/// Files changed by a build relative to its predecessor in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildDiff {
    pub added: BTreeMap<String, String>,
    pub modified: BTreeMap<String, String>,
    pub removed: BTreeSet<String>,
}

impl BuildDiff {
    /// Upsert `added` and `modified`, then drop `removed`.
    pub fn apply_to(&self, state: &mut FileState) {
        for (path, hash) in self.added.iter().chain(self.modified.iter()) {
            state.insert(path.clone(), hash.clone());
        }
        for path in &self.removed {
            state.remove(path);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

/// One released build as described by the source manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRecord {
    pub version: BuildVersion,
    pub parent: Option<String>,
    /// Module name to aggregate checksum as of this build.
    pub modules: BTreeMap<String, String>,
    pub diff: BuildDiff,
}
