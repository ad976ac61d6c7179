//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! to match production behavior and properly test migrations, constraints, and indexes.

#![allow(dead_code)]

use shelf_core::{MediaRecord, NewNode, NodeId, TrackMetadata, TreeNode, TreeStore};
use shelf_storage::SqliteTreeStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = shelf_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        shelf_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Create a test database whose connections do not enforce foreign keys,
    /// so orphaned rows can be inserted
    pub async fn without_foreign_keys() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))
            .expect("Invalid database url")
            .create_if_missing(true)
            .foreign_keys(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create pool");

        shelf_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open a store on a fresh transaction
    pub async fn store(&self) -> SqliteTreeStore {
        SqliteTreeStore::begin(&self.pool)
            .await
            .expect("Failed to begin transaction")
    }
}

/// Test fixture: Create a directory node
pub async fn create_test_dir(store: &mut SqliteTreeStore, parent: NodeId, name: &str) -> TreeNode {
    store
        .create_node(NewNode::directory(
            parent,
            name,
            PathBuf::from(format!("/music/{name}")),
        ))
        .await
        .expect("Failed to create directory node")
}

/// Test fixture: Create a file node with a metadata record
pub async fn create_test_track(
    store: &mut SqliteTreeStore,
    parent: NodeId,
    name: &str,
    artist: &str,
) -> TreeNode {
    let node = store
        .create_node(NewNode::file(
            parent,
            name,
            PathBuf::from(format!("/music/{name}")),
        ))
        .await
        .expect("Failed to create file node");

    let metadata = TrackMetadata {
        title: Some(name.to_string()),
        artist: Some(artist.to_string()),
        ..TrackMetadata::new()
    };
    store
        .upsert_media(&MediaRecord::from_metadata(node.id, name, metadata))
        .await
        .expect("Failed to store metadata");

    node
}
