//! Shelf Core
//!
//! Platform-agnostic core types, traits, and error handling for Shelf.
//!
//! This crate provides the building blocks shared by the storage, scanner,
//! metadata and sync crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TreeNode`, `MediaRecord`, `TrackMetadata`, `LibraryEntry`
//! - **Core Traits**: `TreeStore` (persistence), `MetadataReader` (tag reading)
//! - **Error Handling**: Unified `ShelfError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use shelf_core::types::{NewNode, ROOT_NODE_ID};
//! use std::path::PathBuf;
//!
//! let node = NewNode::file(ROOT_NODE_ID, "song.mp3", PathBuf::from("/music/song.mp3"));
//! assert_eq!(node.mtime, 0);
//! assert!(!node.is_dir);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, ShelfError};
pub use storage::TreeStore;
pub use traits::MetadataReader;

pub use types::{
    LibraryEntry, MediaRecord, NewNode, NodeId, StoreCounts, TrackMetadata, TreeNode,
    ROOT_NODE_ID,
};
