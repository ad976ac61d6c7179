//! End-to-end runs of the sync manager
//!
//! Most tests use the in-memory store; the SQLite tests use a real database
//! file and a real directory tree to check commit and rollback behaviour.

mod common;

use async_trait::async_trait;
use common::{FakeReader, VirtualDir};
use shelf_core::{
    LibraryEntry, MediaRecord, NewNode, NodeId, ShelfError, StoreCounts, TreeNode, TreeStore,
    ROOT_NODE_ID,
};
use shelf_scanner::{ExclusionFilter, FsDirectory};
use shelf_storage::{MemoryTreeStore, SqliteTreeStore};
use shelf_sync::{SyncError, SyncManager, SyncPhase, SyncProgress, UrlMapper};
use sqlx::SqlitePool;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn urls() -> UrlMapper {
    UrlMapper::new([("/music", "https://m.example.com")])
}

#[tokio::test]
async fn test_first_run_on_empty_store() {
    let mut store = MemoryTreeStore::new();
    let reader = FakeReader::new().with_tags("song.mp3", Some("X"), Some("Y"));
    let root = VirtualDir::root("/music").dir("A", |a| a.file("song.mp3", 100));

    let report = SyncManager::new(reader, urls())
        .run(&mut store, &root)
        .await
        .unwrap();

    let dir = store.nodes().find(|n| n.name == "A").unwrap();
    assert!(dir.is_dir);
    assert_eq!(dir.mtime, 0);
    let song = store.nodes().find(|n| n.name == "song.mp3").unwrap();
    assert_eq!(song.mtime, 100);
    assert_eq!(song.parent_id, Some(dir.id));

    let records: Vec<&MediaRecord> = store.media_records().collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title.as_deref(), Some("X"));
    assert_eq!(records[0].artist.as_deref(), Some("Y"));

    let graph = &report.graph;
    assert_eq!(graph.files.len(), 1);
    assert_eq!(graph.artists.len(), 1);
    assert_eq!(graph.artists[0].name.as_deref(), Some("Y"));
    assert_eq!(graph.albums.len(), 1);
    assert_eq!(graph.albums[0].name, None);
    assert_eq!(
        graph.files[0].url.as_deref(),
        Some("https://m.example.com/A/song.mp3")
    );

    let summary = &report.summary;
    assert_eq!(summary.directories_created, 1);
    assert_eq!(summary.files_created, 1);
    assert_eq!(summary.tasks_queued, 1);
    assert_eq!(summary.files_refreshed, 1);
    assert_eq!(summary.files_failed, 0);
    assert_eq!(summary.tracks_exported, 1);
}

#[tokio::test]
async fn test_second_run_without_changes_is_idempotent() {
    let mut store = MemoryTreeStore::new();
    let reader = FakeReader::new().with_tags("song.mp3", Some("X"), Some("Y"));
    let root = VirtualDir::root("/music")
        .dir("A", |a| a.file("song.mp3", 100))
        .file("other.mp3", 5);
    let manager = SyncManager::new(reader.clone(), urls());

    let first = manager.run(&mut store, &root).await.unwrap();
    let mutations = store.mutations();
    let reads = reader.reads();

    let second = manager.run(&mut store, &root).await.unwrap();

    assert_eq!(store.mutations(), mutations);
    assert_eq!(reader.reads(), reads);
    assert_eq!(second.summary.tasks_queued, 0);
    assert_eq!(second.summary.nodes_deleted, 0);
    assert_eq!(second.graph.files, first.graph.files);
}

#[tokio::test]
async fn test_failed_extraction_does_not_stop_the_run() {
    let mut store = MemoryTreeStore::new();
    let reader = FakeReader::new()
        .with_tags("good.mp3", Some("Good"), Some("Band"))
        .with_tags("bad.mp3", Some("Bad"), Some("Band"));
    let mut root = VirtualDir::root("/music");
    root.insert("bad.mp3", 10);
    root.insert("good.mp3", 10);
    let manager = SyncManager::new(reader.clone(), urls());
    manager.run(&mut store, &root).await.unwrap();
    assert_eq!(store.media_records().count(), 2);

    // bad.mp3 is rewritten and now fails to parse
    reader.fail("bad.mp3");
    root.insert("bad.mp3", 20);
    let report = manager.run(&mut store, &root).await.unwrap();

    assert_eq!(report.summary.files_failed, 1);
    let bad = store.nodes().find(|n| n.name == "bad.mp3").unwrap().clone();
    assert_eq!(bad.mtime, 0);
    assert!(store.get_media(bad.id).await.unwrap().is_none());
    assert_eq!(store.media_records().count(), 1);
    assert_eq!(report.graph.files.len(), 1);
    assert_eq!(report.graph.files[0].title, "Good");
}

#[tokio::test]
async fn test_progress_is_reported_per_phase() {
    let mut store = MemoryTreeStore::new();
    let seen: Arc<Mutex<Vec<SyncProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let root = VirtualDir::root("/music").file("a.mp3", 1).file("b.mp3", 1);

    SyncManager::new(FakeReader::new(), urls())
        .on_progress(Box::new(move |progress| {
            sink.lock().unwrap().push(progress.clone());
        }))
        .run(&mut store, &root)
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    let phases: Vec<SyncPhase> = seen.iter().map(|p| p.phase).collect();
    assert_eq!(
        phases,
        vec![
            SyncPhase::Scanning,
            SyncPhase::MetadataExtraction,
            SyncPhase::MetadataExtraction,
            SyncPhase::Cleanup,
            SyncPhase::Export,
        ]
    );
    assert_eq!((seen[2].processed, seen[2].total), (2, 2));
    assert_eq!(seen[2].current_item.as_deref(), Some("/music/b.mp3"));
}

#[tokio::test]
async fn test_orphans_are_swept_during_run() {
    let mut store = MemoryTreeStore::new();
    store.insert_raw_node(TreeNode {
        id: 50,
        parent_id: Some(49),
        name: "stray".to_string(),
        path: "/music/stray".into(),
        mtime: 0,
        is_dir: true,
    });

    let report = SyncManager::new(FakeReader::new(), urls())
        .run(&mut store, &VirtualDir::root("/music"))
        .await
        .unwrap();

    assert_eq!(report.summary.orphans_cleaned, 1);
    assert_eq!(store.nodes().count(), 1);
}

#[tokio::test]
async fn test_missing_root_is_invalid_state() {
    let mut store = MemoryTreeStore::new();
    let mut broken = Faulty::missing_root(&mut store);

    let result = SyncManager::new(FakeReader::new(), urls())
        .run(&mut broken, &VirtualDir::root("/music"))
        .await;

    assert!(matches!(result, Err(SyncError::InvalidState(_))));
}

// ============================================================================
// SQLite
// ============================================================================

async fn sqlite_pool(temp: &TempDir) -> SqlitePool {
    let url = format!("sqlite://{}", temp.path().join("shelf.db").display());
    let pool = shelf_storage::create_pool(&url)
        .await
        .expect("Failed to create pool");
    shelf_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

fn write_library(base: &Path) {
    fs::create_dir_all(base.join("A")).unwrap();
    fs::create_dir_all(base.join("B/C")).unwrap();
    fs::write(base.join("A/song.mp3"), b"fake").unwrap();
    fs::write(base.join("A/cover.jpg"), b"fake").unwrap();
    fs::write(base.join("B/C/deep.mp3"), b"fake").unwrap();
}

#[tokio::test]
async fn test_sqlite_run_commits_and_repeats_cleanly() {
    let db_dir = TempDir::new().unwrap();
    let library = TempDir::new().unwrap();
    write_library(library.path());
    let pool = sqlite_pool(&db_dir).await;

    let reader = FakeReader::new().with_tags("song.mp3", Some("X"), Some("Y"));
    let manager = SyncManager::new(
        reader,
        UrlMapper::new([(library.path(), "https://m.example.com")]),
    );
    let root = FsDirectory::physical(library.path(), ExclusionFilter::new());

    let mut store = SqliteTreeStore::begin(&pool).await.unwrap();
    let first = manager.run(&mut store, &root).await.unwrap();
    store.commit().await.unwrap();

    assert_eq!(first.summary.directories_created, 3);
    assert_eq!(first.summary.files_created, 2);
    assert_eq!(first.graph.files.len(), 2);
    assert_eq!(first.graph.files[0].title, "X");
    assert_eq!(first.graph.files[1].title, "[deep.mp3]");

    let mut store = SqliteTreeStore::begin(&pool).await.unwrap();
    let second = manager.run(&mut store, &root).await.unwrap();
    let counts = store.counts().await.unwrap();
    store.commit().await.unwrap();

    assert_eq!(second.summary.tasks_queued, 0);
    assert_eq!(counts, StoreCounts { nodes: 6, media: 2 });

    // Remove B and run again
    fs::remove_dir_all(library.path().join("B")).unwrap();
    let mut store = SqliteTreeStore::begin(&pool).await.unwrap();
    let third = manager.run(&mut store, &root).await.unwrap();
    let counts = store.counts().await.unwrap();
    store.commit().await.unwrap();

    assert_eq!(third.summary.nodes_deleted, 1);
    assert_eq!(counts, StoreCounts { nodes: 3, media: 1 });
}

#[tokio::test]
async fn test_sqlite_aborted_run_rolls_back() {
    let db_dir = TempDir::new().unwrap();
    let library = TempDir::new().unwrap();
    write_library(library.path());
    let pool = sqlite_pool(&db_dir).await;
    let root = FsDirectory::physical(library.path(), ExclusionFilter::new());
    let manager = SyncManager::new(FakeReader::new(), UrlMapper::default());

    let mut store = SqliteTreeStore::begin(&pool).await.unwrap();
    let result = manager
        .run(&mut Faulty::failing_cleanup(&mut store), &root)
        .await;
    assert!(matches!(result, Err(SyncError::Store(_))));
    drop(store);

    let mut store = SqliteTreeStore::begin(&pool).await.unwrap();
    let counts = store.counts().await.unwrap();
    assert_eq!(counts, StoreCounts { nodes: 1, media: 0 });
}

// ============================================================================
// Faulty store
// ============================================================================

/// Delegates to the inner store, optionally hiding the root node or failing
/// the orphan sweep
struct Faulty<'a, S> {
    inner: &'a mut S,
    hide_root: bool,
    fail_cleanup: bool,
}

impl<'a, S> Faulty<'a, S> {
    fn failing_cleanup(inner: &'a mut S) -> Self {
        Self {
            inner,
            hide_root: false,
            fail_cleanup: true,
        }
    }

    fn missing_root(inner: &'a mut S) -> Self {
        Self {
            inner,
            hide_root: true,
            fail_cleanup: false,
        }
    }
}

#[async_trait]
impl<'a, S: TreeStore> TreeStore for Faulty<'a, S> {
    async fn get_node(&mut self, id: NodeId) -> shelf_core::Result<Option<TreeNode>> {
        if self.hide_root && id == ROOT_NODE_ID {
            return Ok(None);
        }
        self.inner.get_node(id).await
    }

    async fn children(&mut self, parent: NodeId) -> shelf_core::Result<Vec<TreeNode>> {
        self.inner.children(parent).await
    }

    async fn create_node(&mut self, node: NewNode) -> shelf_core::Result<TreeNode> {
        self.inner.create_node(node).await
    }

    async fn delete_node(&mut self, id: NodeId) -> shelf_core::Result<()> {
        self.inner.delete_node(id).await
    }

    async fn set_mtime(&mut self, id: NodeId, mtime: i64) -> shelf_core::Result<()> {
        self.inner.set_mtime(id, mtime).await
    }

    async fn get_media(&mut self, node_id: NodeId) -> shelf_core::Result<Option<MediaRecord>> {
        self.inner.get_media(node_id).await
    }

    async fn upsert_media(&mut self, record: &MediaRecord) -> shelf_core::Result<()> {
        self.inner.upsert_media(record).await
    }

    async fn delete_media(&mut self, node_id: NodeId) -> shelf_core::Result<bool> {
        self.inner.delete_media(node_id).await
    }

    async fn library_entries(&mut self) -> shelf_core::Result<Vec<LibraryEntry>> {
        self.inner.library_entries().await
    }

    async fn delete_orphan_nodes(&mut self) -> shelf_core::Result<u64> {
        if self.fail_cleanup {
            return Err(ShelfError::Database("disk I/O error".to_string()));
        }
        self.inner.delete_orphan_nodes().await
    }

    async fn delete_orphan_media(&mut self) -> shelf_core::Result<u64> {
        self.inner.delete_orphan_media().await
    }

    async fn counts(&mut self) -> shelf_core::Result<StoreCounts> {
        self.inner.counts().await
    }
}
