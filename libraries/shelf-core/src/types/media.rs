//! Per-file metadata

use super::node::NodeId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tag fields as returned by a metadata reader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub track_number: Option<u32>,
    pub duration_seconds: Option<f64>,
}

impl TrackMetadata {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Stored metadata, owned one-to-one by a file node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub node_id: NodeId,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub track_number: Option<u32>,
    pub duration_seconds: Option<f64>,
}

impl MediaRecord {
    /// Build the record for `node_id` from freshly read tags.
    ///
    /// An empty or missing title is replaced by `[file_name]`.
    pub fn from_metadata(node_id: NodeId, file_name: &str, metadata: TrackMetadata) -> Self {
        let title = match metadata.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => display_title(file_name),
        };

        Self {
            node_id,
            title: Some(title),
            artist: metadata.artist,
            album: metadata.album,
            genre: metadata.genre,
            track_number: metadata.track_number,
            duration_seconds: metadata.duration_seconds,
        }
    }
}

/// Synthetic title shown for files without a title tag
pub fn display_title(file_name: &str) -> String {
    format!("[{}]", file_name)
}

/// A metadata record together with the path of the file that owns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub path: PathBuf,
    pub media: MediaRecord,
}
