//! Denormalized track/album/artist graph for the consumer

use crate::error::Result;
use crate::url_map::UrlMapper;
use serde::Serialize;
use shelf_core::types::display_title;
use shelf_core::{LibraryEntry, MediaRecord, TreeStore};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// One exported file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportTrack {
    pub id: usize,
    pub title: String,
    /// `None` when no configured root contains the file
    pub url: Option<String>,
    /// Index into [`ExportGraph::artists`]
    pub artist: usize,
    /// Index into [`ExportGraph::albums`]
    pub album: usize,
    pub track: Option<u32>,
    pub genre: Option<String>,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportAlbum {
    pub name: Option<String>,
    pub artists: Vec<usize>,
    pub tracks: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportArtist {
    pub name: Option<String>,
    pub albums: Vec<usize>,
    pub tracks: Vec<usize>,
}

/// The exported read-model
///
/// Ids are positions in the owning collection, assigned in the order records
/// are pushed. Album and artist keys compare names exactly; a missing name is
/// a key of its own.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportGraph {
    pub files: Vec<ExportTrack>,
    pub albums: Vec<ExportAlbum>,
    pub artists: Vec<ExportArtist>,
    #[serde(skip)]
    album_ids: HashMap<Option<String>, usize>,
    #[serde(skip)]
    artist_ids: HashMap<Option<String>, usize>,
}

impl ExportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the graph and return the new track id
    pub fn push(&mut self, path: &Path, media: &MediaRecord, url: Option<String>) -> usize {
        let album = self.album_id(&media.album);
        let artist = self.artist_id(&media.artist);
        let id = self.files.len();

        let title = media.title.clone().unwrap_or_else(|| {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            display_title(&file_name)
        });

        self.files.push(ExportTrack {
            id,
            title,
            url,
            artist,
            album,
            track: media.track_number,
            genre: media.genre.clone(),
            duration: media.duration_seconds,
        });

        let album_entry = &mut self.albums[album];
        album_entry.tracks.push(id);
        if !album_entry.artists.contains(&artist) {
            album_entry.artists.push(artist);
        }

        let artist_entry = &mut self.artists[artist];
        artist_entry.tracks.push(id);
        if !artist_entry.albums.contains(&album) {
            artist_entry.albums.push(album);
        }

        id
    }

    fn album_id(&mut self, name: &Option<String>) -> usize {
        if let Some(&id) = self.album_ids.get(name) {
            return id;
        }
        let id = self.albums.len();
        self.albums.push(ExportAlbum {
            name: name.clone(),
            artists: Vec::new(),
            tracks: Vec::new(),
        });
        self.album_ids.insert(name.clone(), id);
        id
    }

    fn artist_id(&mut self, name: &Option<String>) -> usize {
        if let Some(&id) = self.artist_ids.get(name) {
            return id;
        }
        let id = self.artists.len();
        self.artists.push(ExportArtist {
            name: name.clone(),
            albums: Vec::new(),
            tracks: Vec::new(),
        });
        self.artist_ids.insert(name.clone(), id);
        id
    }
}

/// Builds the export graph from stored metadata
pub struct ExportBuilder<'a> {
    urls: &'a UrlMapper,
}

impl<'a> ExportBuilder<'a> {
    pub fn new(urls: &'a UrlMapper) -> Self {
        Self { urls }
    }

    /// Fold entries in the given order
    pub fn build(&self, entries: &[LibraryEntry]) -> ExportGraph {
        let mut graph = ExportGraph::new();

        for entry in entries {
            let url = self.urls.map(&entry.path);
            if url.is_none() {
                warn!("No URL mapping for {}", entry.path.display());
            }
            graph.push(&entry.path, &entry.media, url);
        }

        debug!(
            "Export graph: {} tracks, {} albums, {} artists",
            graph.files.len(),
            graph.albums.len(),
            graph.artists.len()
        );

        graph
    }

    /// Read every entry from the store (ordered by path) and fold it
    pub async fn build_from_store<S>(&self, store: &mut S) -> Result<ExportGraph>
    where
        S: TreeStore + ?Sized,
    {
        let entries = store.library_entries().await?;
        Ok(self.build(&entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(node_id: i64, path: &str, artist: Option<&str>, album: Option<&str>) -> LibraryEntry {
        LibraryEntry {
            path: PathBuf::from(path),
            media: MediaRecord {
                node_id,
                title: Some(format!("Track {node_id}")),
                artist: artist.map(str::to_string),
                album: album.map(str::to_string),
                genre: None,
                track_number: Some(node_id as u32),
                duration_seconds: Some(180.0),
            },
        }
    }

    #[test]
    fn test_same_artist_is_deduplicated() {
        let urls = UrlMapper::new([("/music", "https://m.example.com")]);
        let entries = vec![
            entry(1, "/music/a.mp3", Some("Y"), Some("First")),
            entry(2, "/music/b.mp3", Some("Y"), Some("First")),
        ];

        let graph = ExportBuilder::new(&urls).build(&entries);

        assert_eq!(graph.files.len(), 2);
        assert_eq!(graph.artists.len(), 1);
        assert_eq!(graph.albums.len(), 1);
        assert_eq!(graph.artists[0].tracks, vec![0, 1]);
        assert_eq!(graph.artists[0].albums, vec![0]);
        assert_eq!(graph.albums[0].artists, vec![0]);
        assert_eq!(graph.albums[0].tracks, vec![0, 1]);
    }

    #[test]
    fn test_keys_are_exact_and_missing_names_group_together() {
        let urls = UrlMapper::default();
        let entries = vec![
            entry(1, "/a.mp3", Some("Band"), None),
            entry(2, "/b.mp3", Some("band"), None),
            entry(3, "/c.mp3", None, None),
        ];

        let graph = ExportBuilder::new(&urls).build(&entries);

        let artists: Vec<Option<&str>> =
            graph.artists.iter().map(|a| a.name.as_deref()).collect();
        assert_eq!(artists, vec![Some("Band"), Some("band"), None]);
        assert_eq!(graph.albums.len(), 1);
        assert_eq!(graph.albums[0].name, None);
        assert_eq!(graph.albums[0].artists, vec![0, 1, 2]);
        assert!(graph.files.iter().all(|track| track.url.is_none()));
    }

    #[test]
    fn test_cross_references_follow_first_occurrence() {
        let urls = UrlMapper::default();
        let entries = vec![
            entry(1, "/1.mp3", Some("A"), Some("X")),
            entry(2, "/2.mp3", Some("B"), Some("Y")),
            entry(3, "/3.mp3", Some("A"), Some("Y")),
        ];

        let graph = ExportBuilder::new(&urls).build(&entries);

        assert_eq!(graph.files[2].artist, 0);
        assert_eq!(graph.files[2].album, 1);
        assert_eq!(graph.artists[0].albums, vec![0, 1]);
        assert_eq!(graph.albums[1].artists, vec![1, 0]);
        assert_eq!(graph.albums[1].tracks, vec![1, 2]);
    }

    #[test]
    fn test_missing_title_uses_file_name() {
        let mut graph = ExportGraph::new();
        let mut media = entry(1, "/m/song.mp3", None, None).media;
        media.title = None;

        graph.push(Path::new("/m/song.mp3"), &media, None);

        assert_eq!(graph.files[0].title, "[song.mp3]");
    }

    #[test]
    fn test_serialized_shape() {
        let urls = UrlMapper::new([("/music", "https://m.example.com")]);
        let graph = ExportBuilder::new(&urls).build(&[entry(
            7,
            "/music/A/song.mp3",
            Some("Y"),
            None,
        )]);

        let value = serde_json::to_value(&graph).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "files": [{
                    "id": 0,
                    "title": "Track 7",
                    "url": "https://m.example.com/A/song.mp3",
                    "artist": 0,
                    "album": 0,
                    "track": 7,
                    "genre": null,
                    "duration": 180.0
                }],
                "albums": [{ "name": null, "artists": [0], "tracks": [0] }],
                "artists": [{ "name": "Y", "albums": [0], "tracks": [0] }]
            })
        );
    }
}
