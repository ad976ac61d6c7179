use shelf_core::ShelfError;
use thiserror::Error;

/// Errors that abort a sync run
///
/// Anything surfacing here means the run must be rolled back. Per-file
/// extraction problems never become a `SyncError`.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Store error: {0}")]
    Store(#[from] ShelfError),

    #[error("Invalid sync state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
