//! # Winter Manifest
//!
//! Build history of Winter CMS, loaded from the published source manifest (one diff per build)
//! and the forks manifest (where a version line branches from another).
//!
//! ```text
//! builds.json ──┐
//!               ├──> BuildIndex (version key -> BuildRecord, ForkMap)
//! forks.json ───┘          │
//!                          └──> state_at(version): replayed path -> hash map
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use winter_manifest::{BuildIndex, FileFetcher};
//!
//! fn main() -> winter_manifest::Result<()> {
//!     let index = BuildIndex::load(&FileFetcher, "builds.json", "forks.json")?;
//!     let latest = index.list_builds().last().map(|v| v.to_string());
//!     if let Some(version) = latest {
//!         println!("{version}: {} files", index.state_at(&version)?.len());
//!     }
//!     Ok(())
//! }
//! ```

mod document;
mod error;
mod fetch;
mod index;
mod record;
mod state;
mod version;

pub use error::{DocumentKind, ManifestError, Result};
pub use fetch::{DocumentFetcher, FileFetcher};
pub use index::{BuildIndex, ForkMap};
pub use record::{BuildDiff, BuildRecord, FileState};
pub use version::{version_key, BuildVersion};
