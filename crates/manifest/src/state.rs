use crate::error::{ManifestError, Result};
use crate::index::BuildIndex;
use crate::record::FileState;
use crate::version::version_key;

impl BuildIndex {
    /// Complete expected file set at `version`.
    ///
    /// Replays every build up to and including the target in ascending order. When a visited
    /// build is a fork child, the running state is replaced (not merged) by the state of its fork
    /// parent before that build's diff is applied, so the latest fork child visited wins.
    pub fn state_at(&self, version: &str) -> Result<FileState> {
        let key = version_key(version)?;
        if !self.builds.contains_key(&key) {
            return Err(ManifestError::UnknownBuild(version.to_string()));
        }
        self.state_at_key(key)
    }

    /// [`BuildIndex::state_at`] addressed by version key.
    pub fn state_at_key(&self, key: u64) -> Result<FileState> {
        let mut visiting = Vec::new();
        self.replay(key, &mut visiting)
    }

    fn replay(&self, target: u64, visiting: &mut Vec<u64>) -> Result<FileState> {
        let Some(target_record) = self.builds.get(&target) else {
            return Err(ManifestError::UnknownBuild(display_key(target)));
        };
        if visiting.contains(&target) {
            return Err(ManifestError::ForkCycle(target_record.version.to_string()));
        }
        visiting.push(target);

        let mut state = FileState::new();
        for (&number, record) in self.builds.range(..=target) {
            if let Some(parent) = self.forks.parent_of(number) {
                state = self.replay(parent, visiting)?;
            }
            record.diff.apply_to(&mut state);
        }

        visiting.pop();
        Ok(state)
    }
}

fn display_key(key: u64) -> String {
    format!(
        "{}.{}.{}",
        key / 1_000_000,
        (key / 1_000) % 1_000,
        key % 1_000
    )
}
