/// Core traits for Shelf
use crate::error::Result;
use crate::types::TrackMetadata;
use std::path::Path;

/// Metadata reader trait
///
/// Implementers extract tag metadata from audio files. Every error returned
/// here is treated as an extraction failure by the refresh engine, whatever
/// its cause, so implementations should not use it for store problems.
pub trait MetadataReader: Send + Sync {
    /// Read metadata from an audio file
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or its tags cannot be parsed
    fn read(&self, path: &Path) -> Result<TrackMetadata>;
}
