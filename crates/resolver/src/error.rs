use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Manifest(#[from] winter_manifest::ManifestError),

    #[error("The source manifest does not list any builds")]
    NoBuilds,

    #[error("No build in the source manifest expects any files for the scanned modules")]
    NoCandidate,
}
