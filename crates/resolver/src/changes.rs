use std::collections::BTreeMap;
use winter_manifest::FileState;
use winter_protocol::ChangeSet;

/// Added, modified and removed files of `local` relative to a build's expected state.
///
/// Whatever is left of `expected` after every local path has been matched counts as removed.
#[must_use]
pub fn diff_against_state(local: &BTreeMap<String, String>, mut expected: FileState) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (path, hash) in local {
        match expected.remove(path) {
            None => {
                changes.added.insert(path.clone(), hash.clone());
            }
            Some(expected_hash) if expected_hash != *hash => {
                changes.modified.insert(path.clone(), hash.clone());
            }
            Some(_) => {}
        }
    }

    changes.removed = expected.into_keys().collect();
    changes
}
