//! Shelf Sync
//!
//! Keeps the stored tree in step with the filesystem and derives the export.
//!
//! A run goes through four phases, all against one store handle that the
//! caller has already placed inside a transaction:
//!
//! 1. [`Reconciler`]: diff the live tree against the stored tree, create and
//!    delete nodes, and queue an [`UpdateTask`] for every new or modified file
//! 2. [`MetadataRefresher`]: read tags for each queued file; failures are
//!    recorded as "retry later" instead of aborting
//! 3. [`cleanup_orphans`]: remove rows whose parent or owner is gone
//! 4. [`ExportBuilder`]: fold every metadata record into the track, album and
//!    artist graph
//!
//! [`SyncManager`] runs the phases in order and reports progress.

mod cleaner;
mod error;
mod export;
mod manager;
mod reconciler;
mod refresh;
mod types;
mod url_map;

// Public exports
pub use cleaner::cleanup_orphans;
pub use error::{Result, SyncError};
pub use export::{ExportAlbum, ExportArtist, ExportBuilder, ExportGraph, ExportTrack};
pub use manager::{SyncManager, SyncReport};
pub use reconciler::{ReconcileOutcome, Reconciler, UpdateTask};
pub use refresh::{MetadataRefresher, RefreshOutcome};
pub use types::{ProgressCallback, SyncPhase, SyncProgress, SyncSummary};
pub use url_map::UrlMapper;
