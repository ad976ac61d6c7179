use async_trait::async_trait;
use shelf_core::{
    error::Result, LibraryEntry, MediaRecord, NewNode, NodeId, ShelfError, StoreCounts, TreeNode,
    TreeStore, ROOT_NODE_ID,
};
use std::collections::BTreeMap;

/// In-memory tree store with the same semantics as the `SQLite` one
///
/// Used to exercise the sync engine without a database. It also counts every
/// mutating call that changed a row, which makes "no writes happened" easy to
/// assert.
#[derive(Debug, Clone)]
pub struct MemoryTreeStore {
    nodes: BTreeMap<NodeId, TreeNode>,
    media: BTreeMap<NodeId, MediaRecord>,
    next_id: NodeId,
    mutations: u64,
}

impl Default for MemoryTreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTreeStore {
    /// Empty store containing only the root node
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(ROOT_NODE_ID, TreeNode::root());

        Self {
            nodes,
            media: BTreeMap::new(),
            next_id: ROOT_NODE_ID + 1,
            mutations: 0,
        }
    }

    /// Number of row changes applied so far
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    /// Every node, ordered by ID
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.values()
    }

    /// Every metadata record, ordered by node ID
    pub fn media_records(&self) -> impl Iterator<Item = &MediaRecord> {
        self.media.values()
    }

    /// Insert a node row as-is, without checking its parent.
    ///
    /// Lets tests build states the normal write path never produces.
    pub fn insert_raw_node(&mut self, node: TreeNode) {
        self.next_id = self.next_id.max(node.id + 1);
        self.nodes.insert(node.id, node);
    }

    /// Insert a metadata row as-is, without checking its node
    pub fn insert_raw_media(&mut self, record: MediaRecord) {
        self.media.insert(record.node_id, record);
    }

    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut collected = vec![id];
        let mut cursor = 0;
        while cursor < collected.len() {
            let current = collected[cursor];
            collected.extend(
                self.nodes
                    .values()
                    .filter(|node| node.parent_id == Some(current))
                    .map(|node| node.id),
            );
            cursor += 1;
        }
        collected
    }
}

#[async_trait]
impl TreeStore for MemoryTreeStore {
    async fn get_node(&mut self, id: NodeId) -> Result<Option<TreeNode>> {
        Ok(self.nodes.get(&id).cloned())
    }

    async fn children(&mut self, parent: NodeId) -> Result<Vec<TreeNode>> {
        let mut children: Vec<TreeNode> = self
            .nodes
            .values()
            .filter(|node| node.parent_id == Some(parent))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn create_node(&mut self, node: NewNode) -> Result<TreeNode> {
        if !self.nodes.contains_key(&node.parent_id) {
            return Err(ShelfError::not_found("Node", node.parent_id.to_string()));
        }

        let created = TreeNode {
            id: self.next_id,
            parent_id: Some(node.parent_id),
            name: node.name,
            path: node.path,
            mtime: node.mtime,
            is_dir: node.is_dir,
        };
        self.next_id += 1;
        self.nodes.insert(created.id, created.clone());
        self.mutations += 1;

        Ok(created)
    }

    async fn delete_node(&mut self, id: NodeId) -> Result<()> {
        if id == ROOT_NODE_ID {
            return Err(ShelfError::invalid_input("the root node cannot be deleted"));
        }

        for victim in self.subtree(id) {
            if self.nodes.remove(&victim).is_some() {
                self.mutations += 1;
            }
            if self.media.remove(&victim).is_some() {
                self.mutations += 1;
            }
        }

        Ok(())
    }

    async fn set_mtime(&mut self, id: NodeId, mtime: i64) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| ShelfError::not_found("Node", id.to_string()))?;
        node.mtime = mtime;
        self.mutations += 1;
        Ok(())
    }

    async fn get_media(&mut self, node_id: NodeId) -> Result<Option<MediaRecord>> {
        Ok(self.media.get(&node_id).cloned())
    }

    async fn upsert_media(&mut self, record: &MediaRecord) -> Result<()> {
        if !self.nodes.contains_key(&record.node_id) {
            return Err(ShelfError::not_found("Node", record.node_id.to_string()));
        }

        self.media.insert(record.node_id, record.clone());
        self.mutations += 1;
        Ok(())
    }

    async fn delete_media(&mut self, node_id: NodeId) -> Result<bool> {
        let existed = self.media.remove(&node_id).is_some();
        if existed {
            self.mutations += 1;
        }
        Ok(existed)
    }

    async fn library_entries(&mut self) -> Result<Vec<LibraryEntry>> {
        let mut entries: Vec<LibraryEntry> = self
            .media
            .values()
            .filter_map(|record| {
                self.nodes.get(&record.node_id).map(|node| LibraryEntry {
                    path: node.path.clone(),
                    media: record.clone(),
                })
            })
            .collect();
        entries.sort_by(|a, b| a.path.to_string_lossy().cmp(&b.path.to_string_lossy()));
        Ok(entries)
    }

    async fn delete_orphan_nodes(&mut self) -> Result<u64> {
        let orphans: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|node| node.id != ROOT_NODE_ID)
            .filter(|node| match node.parent_id {
                Some(parent) => !self.nodes.contains_key(&parent),
                None => true,
            })
            .map(|node| node.id)
            .collect();

        for id in &orphans {
            self.nodes.remove(id);
            self.mutations += 1;
        }

        Ok(orphans.len() as u64)
    }

    async fn delete_orphan_media(&mut self) -> Result<u64> {
        let before = self.media.len();
        let nodes = &self.nodes;
        self.media.retain(|node_id, _| nodes.contains_key(node_id));
        let removed = (before - self.media.len()) as u64;
        self.mutations += removed;
        Ok(removed)
    }

    async fn counts(&mut self) -> Result<StoreCounts> {
        Ok(StoreCounts {
            nodes: self.nodes.len() as u64,
            media: self.media.len() as u64,
        })
    }
}
