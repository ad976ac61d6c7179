/// Metadata reader implementation using lofty
use crate::error::{MetadataError, Result};
use lofty::{Accessor, AudioFile, Probe, TaggedFileExt};
use shelf_core::{MetadataReader, TrackMetadata};
use std::borrow::Cow;
use std::path::Path;

/// Metadata reader using the lofty library
pub struct LoftyMetadataReader;

impl LoftyMetadataReader {
    /// Create a new metadata reader
    pub fn new() -> Self {
        Self
    }

    /// Probe the file and collect its tag fields and duration
    pub fn read_file(&self, path: &Path) -> Result<TrackMetadata> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()));
        }

        let tagged_file = Probe::open(path)?.guess_file_type()?.read()?;

        let mut metadata = TrackMetadata::new();
        metadata.duration_seconds = Some(tagged_file.properties().duration().as_secs_f64());

        // Prefer the format's primary tag (ID3v2 for MP3, Vorbis for OGG/FLAC)
        if let Some(tag) = tagged_file.primary_tag().or(tagged_file.first_tag()) {
            metadata.title = non_empty(tag.title());
            metadata.artist = non_empty(tag.artist());
            metadata.album = non_empty(tag.album());
            metadata.genre = non_empty(tag.genre());
            metadata.track_number = tag.track();
        }

        Ok(metadata)
    }
}

impl Default for LoftyMetadataReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataReader for LoftyMetadataReader {
    fn read(&self, path: &Path) -> shelf_core::Result<TrackMetadata> {
        Ok(self.read_file(path)?)
    }
}

fn non_empty(value: Option<Cow<'_, str>>) -> Option<String> {
    value
        .map(|s| s.trim_end_matches('\0').to_string())
        .filter(|s| !s.trim().is_empty())
}
