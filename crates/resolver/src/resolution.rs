use winter_protocol::{ChangeSet, VersionReport, REPORT_SCHEMA_VERSION};

/// Outcome of matching an installation against the build history.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Every scanned module checksum equals the checksum recorded for `build`.
    Exact { build: String },
    /// No build matched exactly; `build` is the most similar one.
    Approximate(ApproximateMatch),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApproximateMatch {
    pub build: String,
    pub score: f64,
    pub confident: bool,
    /// Present only when a detailed resolution was requested.
    pub changes: Option<ChangeSet>,
}

impl Resolution {
    #[must_use]
    pub fn build(&self) -> &str {
        match self {
            Self::Exact { build } => build,
            Self::Approximate(found) => &found.build,
        }
    }

    #[must_use]
    pub const fn is_modified(&self) -> bool {
        matches!(self, Self::Approximate(_))
    }

    #[must_use]
    pub const fn is_confident(&self) -> bool {
        match self {
            Self::Exact { .. } => true,
            Self::Approximate(found) => found.confident,
        }
    }

    #[must_use]
    pub const fn score(&self) -> Option<f64> {
        match self {
            Self::Exact { .. } => None,
            Self::Approximate(found) => Some(found.score),
        }
    }

    #[must_use]
    pub const fn changes(&self) -> Option<&ChangeSet> {
        match self {
            Self::Exact { .. } => None,
            Self::Approximate(found) => found.changes.as_ref(),
        }
    }

    #[must_use]
    pub fn to_report(&self) -> VersionReport {
        VersionReport {
            schema_version: REPORT_SCHEMA_VERSION,
            build: self.build().to_string(),
            modified: self.is_modified(),
            confident: self.is_confident(),
            score: self.score(),
            changes: self.changes().cloned(),
        }
    }
}
