//! Error types for the scanner

use thiserror::Error;

/// Errors raised while building a filesystem view
///
/// Reading directories never produces these; they only come from
/// validating the configured sources.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No source directories configured")]
    NoSources,

    #[error("Invalid mount point {mount:?} for {path}: {reason}")]
    InvalidMount {
        path: String,
        mount: String,
        reason: &'static str,
    },
}
