//! Shelf Scanner
//!
//! Read-only view of the filesystem trees mirrored by Shelf.
//!
//! # Architecture
//!
//! - `directory`: the [`LiveDirectory`] interface and the [`FsDirectory`]
//!   implementation (one physical directory, or several source roots merged
//!   into a single virtual tree)
//! - `filter`: the [`ExclusionFilter`] deciding which entries are mirrored
//!
//! Listing never fails: unreadable entries are logged and skipped, so a
//! permission problem deep inside a library cannot abort a run.

mod error;

pub mod directory;
pub mod filter;

pub use directory::{DirectoryListing, FsDirectory, LiveDirectory, LiveFile, MountedSource};
pub use error::ScanError;
pub use filter::ExclusionFilter;

/// Result type for scanner setup
pub type Result<T> = std::result::Result<T, ScanError>;
