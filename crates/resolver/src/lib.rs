//! # Winter Resolver
//!
//! Determines which Winter CMS build an installation corresponds to.
//!
//! ```text
//! LocalFingerprint ──┐
//!                    ├──> exact module checksum match (earliest build wins)
//! BuildIndex ────────┘          │ miss
//!                               ├──> similarity score per build (last best wins)
//!                               └──> optional file-level diff against the winner
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use winter_fingerprint::Installation;
//! use winter_manifest::{BuildIndex, FileFetcher};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let installation = Installation::open("/var/www/winter", None)?;
//!     let index = BuildIndex::load(&FileFetcher, "builds.json", "forks.json")?;
//!
//!     let resolution = winter_resolver::resolve(installation.fingerprint(), &index, false)?;
//!     println!("{} (modified: {})", resolution.build(), resolution.is_modified());
//!     Ok(())
//! }
//! ```

mod changes;
mod error;
mod resolution;
mod resolver;
mod score;

pub use changes::diff_against_state;
pub use error::{ResolveError, Result};
pub use resolution::{ApproximateMatch, Resolution};
pub use resolver::{find_exact_match, rank_builds, resolve};
pub use score::{is_confident, restrict_to_modules, BuildScore, CONFIDENCE_THRESHOLD};
