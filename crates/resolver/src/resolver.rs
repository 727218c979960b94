use crate::changes::diff_against_state;
use crate::error::{ResolveError, Result};
use crate::resolution::{ApproximateMatch, Resolution};
use crate::score::{restrict_to_modules, BuildScore};
use winter_fingerprint::LocalFingerprint;
use winter_manifest::{BuildIndex, BuildRecord};

/// Match a local fingerprint against every indexed build.
///
/// An exact module checksum match wins outright. Otherwise every build is scored by file
/// similarity and the best one is reported as a modified installation of that build, with
/// the file-level differences attached when `detailed` is set.
pub fn resolve(
    fingerprint: &LocalFingerprint,
    index: &BuildIndex,
    detailed: bool,
) -> Result<Resolution> {
    if index.is_empty() {
        return Err(ResolveError::NoBuilds);
    }

    if let Some(record) = find_exact_match(fingerprint, index) {
        log::debug!("Module checksums match build {}", record.version);
        return Ok(Resolution::Exact {
            build: record.version.to_string(),
        });
    }

    let best = rank_builds(fingerprint, index)?;
    log::debug!(
        "Closest build is {} with score {:.2} ({} of {} expected files found, {} changed)",
        best.build,
        best.score,
        best.found,
        best.expected,
        best.changed
    );

    let changes = if detailed {
        let expected = index.state_at(&best.build)?;
        Some(diff_against_state(fingerprint.files(), expected))
    } else {
        None
    };

    Ok(Resolution::Approximate(ApproximateMatch {
        confident: best.is_confident(),
        build: best.build,
        score: best.score,
        changes,
    }))
}

/// Earliest build whose recorded checksums agree with every scanned module.
#[must_use]
pub fn find_exact_match<'a>(
    fingerprint: &LocalFingerprint,
    index: &'a BuildIndex,
) -> Option<&'a BuildRecord> {
    let local = fingerprint.module_checksums();
    index.records().find(|record| {
        let matching = local
            .iter()
            .filter(|(module, checksum)| record.modules.get(*module) == Some(*checksum))
            .count();
        matching == local.len()
    })
}

/// Score every build and return the best one. Equal scores go to the later build.
pub fn rank_builds(fingerprint: &LocalFingerprint, index: &BuildIndex) -> Result<BuildScore> {
    let modules = fingerprint.module_checksums().keys();
    let mut best: Option<BuildScore> = None;

    for record in index.records() {
        let state = index.state_at_key(record.version.key())?;
        let expected = restrict_to_modules(state, modules.clone());
        let Some(score) =
            BuildScore::compute(record.version.as_str(), fingerprint.files(), &expected)
        else {
            log::debug!(
                "Build {} expects no files in the scanned modules",
                record.version
            );
            continue;
        };

        log::debug!("Build {} scored {:.2}", score.build, score.score);
        if best.as_ref().map_or(true, |current| score.score >= current.score) {
            best = Some(score);
        }
    }

    best.ok_or(ResolveError::NoCandidate)
}
