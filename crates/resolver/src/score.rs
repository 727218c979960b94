use std::collections::BTreeMap;
use winter_fingerprint::module_of;
use winter_manifest::FileState;

/// Minimum similarity score for an approximate match to be reported as trustworthy.
pub const CONFIDENCE_THRESHOLD: f64 = 60.0;

/// Similarity of a local file map to the expected state of one build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildScore {
    pub build: String,
    /// Files the build expects within the scanned modules.
    pub expected: usize,
    /// Local files the build also knows, pristine or not.
    pub found: usize,
    /// Local files the build does not know, plus known ones with a different hash.
    pub changed: usize,
    /// `(found / expected - changed / expected) * 100`, rounded to two decimals.
    pub score: f64,
}

impl BuildScore {
    /// Score a local file map against a build state already restricted to the scanned modules.
    ///
    /// Returns `None` when the build expects no files at all.
    #[must_use]
    pub fn compute(
        build: &str,
        local: &BTreeMap<String, String>,
        expected_state: &FileState,
    ) -> Option<Self> {
        let expected = expected_state.len();
        if expected == 0 {
            return None;
        }

        let mut found = 0usize;
        let mut changed = 0usize;
        for (path, hash) in local {
            match expected_state.get(path) {
                None => changed += 1,
                Some(expected_hash) if expected_hash != hash => {
                    found += 1;
                    changed += 1;
                }
                Some(_) => found += 1,
            }
        }

        Some(Self {
            build: build.to_string(),
            expected,
            found,
            changed,
            score: similarity(found, changed, expected),
        })
    }

    #[must_use]
    pub fn is_confident(&self) -> bool {
        is_confident(self.score)
    }
}

#[must_use]
pub fn is_confident(score: f64) -> bool {
    score >= CONFIDENCE_THRESHOLD
}

#[allow(clippy::cast_precision_loss)]
fn similarity(found: usize, changed: usize, expected: usize) -> f64 {
    let found_percent = found as f64 / expected as f64;
    let changed_percent = changed as f64 / expected as f64;
    round_to_hundredths((found_percent - changed_percent) * 100.0)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Keep only the entries whose `/modules/<module>/` segment is one of `modules`.
pub fn restrict_to_modules<'a>(
    state: FileState,
    modules: impl IntoIterator<Item = &'a String> + Clone,
) -> FileState {
    state
        .into_iter()
        .filter(|(path, _)| {
            module_of(path).is_some_and(|module| modules.clone().into_iter().any(|m| m == module))
        })
        .collect()
}
