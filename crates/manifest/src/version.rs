use crate::error::{ManifestError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static VERSION_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)").expect("valid version regex"));

/// A build version string together with its sort key.
///
/// The key is `major * 1_000_000 + minor * 1_000 + patch`; anything after the patch number
/// (a fourth component, a pre-release tag) is kept in the display string but ignored for
/// ordering, so `1.2.3` and `1.2.3.1` share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildVersion {
    raw: String,
    key: u64,
}

impl BuildVersion {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self {
            raw: raw.to_string(),
            key: version_key(raw)?,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn key(&self) -> u64 {
        self.key
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Integer sort key of a `major.minor.patch[...]` version string.
pub fn version_key(raw: &str) -> Result<u64> {
    let invalid = || ManifestError::InvalidVersion(raw.to_string());
    let captures = VERSION_PREFIX.captures(raw.trim()).ok_or_else(invalid)?;

    let part = |index: usize| -> Result<u64> {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .ok_or_else(invalid)
    };
    let (major, minor, patch) = (part(1)?, part(2)?, part(3)?);

    major
        .checked_mul(1_000_000)
        .and_then(|value| value.checked_add(minor.checked_mul(1_000)?))
        .and_then(|value| value.checked_add(patch))
        .ok_or_else(invalid)
}
