/// Indexer error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Storage error: {0}")]
    Storage(#[from] shelf_storage::StorageError),

    #[error("Source error: {0}")]
    Source(#[from] shelf_scanner::ScanError),

    #[error("Sync error: {0}")]
    Sync(#[from] shelf_sync::SyncError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for IndexerError {
    fn from(err: config::ConfigError) -> Self {
        IndexerError::Config(err.to_string())
    }
}
