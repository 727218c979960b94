//! # Winter Fingerprint
//!
//! Content fingerprinting of a Winter CMS installation.
//!
//! ## Pipeline
//!
//! ```text
//! Installation root
//!     │
//!     ├──> Root validation (modules/system, themes, config/*.php)
//!     │
//!     ├──> File Scanner (modules/<module>/**, natural order)
//!     │      └─> Module files
//!     │
//!     ├──> SHA3-256 over CRLF-normalized content
//!     │      └─> files: /modules/<module>/... -> hash
//!     │
//!     └──> Concatenated per-module hashes, hashed again
//!            └─> module_checksums: module -> hash
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use winter_fingerprint::Installation;
//!
//! fn main() -> winter_fingerprint::Result<()> {
//!     let installation = Installation::open("/var/www/winter", None)?;
//!     let fingerprint = installation.fingerprint();
//!
//!     for (module, checksum) in fingerprint.module_checksums() {
//!         println!("{module}: {checksum}");
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod hashing;
mod installation;
mod modules;
mod natural;
mod scanner;

pub use error::{FingerprintError, Result};
pub use hashing::{digest_hex, hash_file_or_empty, normalize_line_endings};
pub use installation::{scan, validate_root, Installation, LocalFingerprint};
pub use modules::{module_of, ModuleSet, KNOWN_MODULES};
pub use natural::{natural_cmp, sort_natural, sort_natural_by_key};
pub use scanner::{FileScanner, ScannedFile};
