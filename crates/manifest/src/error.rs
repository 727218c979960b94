use thiserror::Error;

pub type Result<T> = std::result::Result<T, ManifestError>;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("{kind} manifest not found at \"{location}\"")]
    NotFound { kind: DocumentKind, location: String },

    #[error("Unable to fetch {kind} manifest from \"{location}\": {message}")]
    Fetch {
        kind: DocumentKind,
        location: String,
        message: String,
    },

    #[error("Unable to decode {kind} manifest JSON data. JSON Error: {source}")]
    Json {
        kind: DocumentKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("The {kind} manifest does not appear to be a valid {kind} manifest file: {reason}")]
    InvalidDocument { kind: DocumentKind, reason: String },

    #[error("Invalid version string \"{0}\" - must be of the format \"major.minor.patch\"")]
    InvalidVersion(String),

    #[error("The specified build \"{0}\" has not been added")]
    UnknownBuild(String),

    #[error("Fork history loops back on build \"{0}\"")]
    ForkCycle(String),
}

/// Which of the two remote documents an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Source,
    Forks,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Forks => f.write_str("forked version"),
        }
    }
}
