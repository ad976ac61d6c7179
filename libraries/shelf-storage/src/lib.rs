//! Shelf Storage
//!
//! `SQLite` persistence for the mirrored library tree.
//!
//! This crate stores two tables: `nodes` (the hierarchical mirror of the
//! filesystem, rooted at node `0`) and `media` (one metadata row per processed
//! file node). Deleting a node removes its whole subtree and the metadata it
//! owns.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: `nodes` and `media` each own their queries
//! - **One transaction per run**: [`SqliteTreeStore`] wraps a single
//!   transaction; dropping it without [`SqliteTreeStore::commit`] rolls back
//! - **Testable**: [`MemoryTreeStore`] implements the same `TreeStore` trait
//!
//! # Example
//!
//! ```rust,no_run
//! use shelf_storage::{create_pool, run_migrations, SqliteTreeStore};
//! use shelf_core::{TreeStore, ROOT_NODE_ID};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://shelf.db").await?;
//! run_migrations(&pool).await?;
//!
//! let mut store = SqliteTreeStore::begin(&pool).await?;
//! let top_level = store.children(ROOT_NODE_ID).await?;
//! store.commit().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod memory;

// Vertical slices
pub mod media;
pub mod nodes;

pub use context::SqliteTreeStore;
pub use error::StorageError;
pub use memory::MemoryTreeStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://shelf.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    // Parse the URL into options so we can configure SQLite behavior
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true) // Create database file if it doesn't exist
        .journal_mode(SqliteJournalMode::Wal) // Use WAL mode for better concurrency
        .foreign_keys(true) // Node deletion cascades through the FKs
        .busy_timeout(std::time::Duration::from_secs(30)); // Wait up to 30s for locks

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("Pool created");

    Ok(pool)
}
