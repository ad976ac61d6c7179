use crate::{error::Result as StorageResult, media, nodes};
use async_trait::async_trait;
use shelf_core::{
    error::Result, LibraryEntry, MediaRecord, NewNode, NodeId, StoreCounts, TreeNode, TreeStore,
};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// `SQLite` tree store scoped to one transaction
///
/// All reads and writes of a sync run go through the same transaction, so the
/// run either becomes visible as a whole on [`commit`](Self::commit) or not at
/// all. Dropping the store rolls back.
pub struct SqliteTreeStore {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteTreeStore {
    /// Open a transaction on the pool
    pub async fn begin(pool: &SqlitePool) -> StorageResult<Self> {
        let tx = pool.begin().await?;
        Ok(Self { tx })
    }

    /// Make every change of this run visible
    pub async fn commit(self) -> StorageResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    /// Discard every change of this run
    pub async fn rollback(self) -> StorageResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl TreeStore for SqliteTreeStore {
    // Nodes
    async fn get_node(&mut self, id: NodeId) -> Result<Option<TreeNode>> {
        nodes::get_by_id(&mut self.tx, id).await
    }

    async fn children(&mut self, parent: NodeId) -> Result<Vec<TreeNode>> {
        nodes::get_children(&mut self.tx, parent).await
    }

    async fn create_node(&mut self, node: NewNode) -> Result<TreeNode> {
        nodes::create(&mut self.tx, node).await
    }

    async fn delete_node(&mut self, id: NodeId) -> Result<()> {
        nodes::delete(&mut self.tx, id).await
    }

    async fn set_mtime(&mut self, id: NodeId, mtime: i64) -> Result<()> {
        nodes::set_mtime(&mut self.tx, id, mtime).await
    }

    // Metadata
    async fn get_media(&mut self, node_id: NodeId) -> Result<Option<MediaRecord>> {
        media::get_by_node(&mut self.tx, node_id).await
    }

    async fn upsert_media(&mut self, record: &MediaRecord) -> Result<()> {
        media::upsert(&mut self.tx, record).await
    }

    async fn delete_media(&mut self, node_id: NodeId) -> Result<bool> {
        media::delete(&mut self.tx, node_id).await
    }

    async fn library_entries(&mut self) -> Result<Vec<LibraryEntry>> {
        media::get_all_with_paths(&mut self.tx).await
    }

    // Orphans
    async fn delete_orphan_nodes(&mut self) -> Result<u64> {
        nodes::delete_orphans(&mut self.tx).await
    }

    async fn delete_orphan_media(&mut self) -> Result<u64> {
        media::delete_orphans(&mut self.tx).await
    }

    async fn counts(&mut self) -> Result<StoreCounts> {
        Ok(StoreCounts {
            nodes: nodes::count(&mut self.tx).await?,
            media: media::count(&mut self.tx).await?,
        })
    }
}
