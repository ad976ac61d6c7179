//! Shelf Indexer Library
//!
//! Configuration, database bootstrap and the run pipeline behind the
//! `shelf-indexer` binary. Exposed as a library for testing purposes.

pub mod config;
pub mod error;
pub mod export_file;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use config::{IndexerConfig, SourceConfig};
pub use error::{IndexerError, Result};
pub use export_file::write_export;
pub use pipeline::{run, RunOptions};
