//! Storage trait for the mirrored tree

use crate::error::Result;
use crate::types::{LibraryEntry, MediaRecord, NewNode, NodeId, StoreCounts, TreeNode};
use async_trait::async_trait;

/// Typed access to the node and metadata tables
///
/// The reconciler, refresh engine, sweeper and export builder only talk to the
/// store through this trait. Implementations are expected to be scoped to a
/// single unit of work (a transaction for SQLite), so every method takes
/// `&mut self`.
#[async_trait]
pub trait TreeStore: Send {
    // ========================================================================
    // Nodes
    // ========================================================================

    /// Get a node by ID
    async fn get_node(&mut self, id: NodeId) -> Result<Option<TreeNode>>;

    /// Get the direct children of a node, ordered by name
    async fn children(&mut self, parent: NodeId) -> Result<Vec<TreeNode>>;

    /// Create a node under an existing parent
    async fn create_node(&mut self, node: NewNode) -> Result<TreeNode>;

    /// Delete a node, all of its descendants and their metadata
    async fn delete_node(&mut self, id: NodeId) -> Result<()>;

    /// Overwrite the stored modification time of a node
    async fn set_mtime(&mut self, id: NodeId, mtime: i64) -> Result<()>;

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Get the metadata record owned by a node
    async fn get_media(&mut self, node_id: NodeId) -> Result<Option<MediaRecord>>;

    /// Insert or replace the metadata record owned by `record.node_id`
    async fn upsert_media(&mut self, record: &MediaRecord) -> Result<()>;

    /// Delete the metadata record owned by a node.
    ///
    /// Returns whether a record existed.
    async fn delete_media(&mut self, node_id: NodeId) -> Result<bool>;

    /// All metadata records joined with their node path, ordered by path
    async fn library_entries(&mut self) -> Result<Vec<LibraryEntry>>;

    // ========================================================================
    // Orphans
    // ========================================================================

    /// Delete non-root nodes whose parent does not exist (one pass)
    async fn delete_orphan_nodes(&mut self) -> Result<u64>;

    /// Delete metadata records whose node does not exist (one pass)
    async fn delete_orphan_media(&mut self) -> Result<u64>;

    /// Row counts for both tables
    async fn counts(&mut self) -> Result<StoreCounts>;
}
