//! Shelf Metadata
//!
//! Tag reading for Shelf.
//!
//! This crate provides the `MetadataReader` implementation used by the sync
//! engine to extract title, artist, album, genre, track number and duration
//! from audio files (MP3, FLAC, OGG, WAV, AAC, OPUS, ...).
//!
//! # Example
//!
//! ```rust,no_run
//! use shelf_metadata::LoftyMetadataReader;
//! use shelf_core::MetadataReader;
//! use std::path::Path;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = LoftyMetadataReader::new();
//! let metadata = reader.read(Path::new("/music/song.mp3"))?;
//! println!("{:?}", metadata.title);
//! # Ok(())
//! # }
//! ```

mod error;
mod reader;

pub use error::{MetadataError, Result};
pub use reader::LoftyMetadataReader;
