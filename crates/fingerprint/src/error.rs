use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FingerprintError>;

#[derive(Error, Debug)]
pub enum FingerprintError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid root specified for the file manifest: {0}")]
    InvalidRoot(String),

    #[error(
        "The given path does not appear to be a Winter CMS installation (missing {})",
        missing.display()
    )]
    InvalidInstallation { missing: PathBuf },
}
