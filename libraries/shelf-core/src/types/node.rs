//! Mirrored filesystem nodes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Node ID type (row id in the `nodes` table)
pub type NodeId = i64;

/// ID of the synthetic root node every tree hangs from
pub const ROOT_NODE_ID: NodeId = 0;

/// A filesystem entry (file or directory) as mirrored in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    /// `None` only for the root node
    pub parent_id: Option<NodeId>,
    /// Leaf name, empty for the root
    pub name: String,
    /// Absolute path, used for all file I/O
    pub path: PathBuf,
    /// Epoch seconds of the last successful extraction; 0 means "never" for
    /// files and is always 0 for directories
    pub mtime: i64,
    pub is_dir: bool,
}

impl TreeNode {
    /// The synthetic root node
    pub fn root() -> Self {
        Self {
            id: ROOT_NODE_ID,
            parent_id: None,
            name: String::new(),
            path: PathBuf::new(),
            mtime: 0,
            is_dir: true,
        }
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_NODE_ID
    }

    pub fn is_file(&self) -> bool {
        !self.is_dir
    }
}

/// A node about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub parent_id: NodeId,
    pub name: String,
    pub path: PathBuf,
    pub mtime: i64,
    pub is_dir: bool,
}

impl NewNode {
    /// New file node, not yet processed
    pub fn file(parent_id: NodeId, name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            parent_id,
            name: name.into(),
            path,
            mtime: 0,
            is_dir: false,
        }
    }

    /// New directory node
    pub fn directory(parent_id: NodeId, name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            parent_id,
            name: name.into(),
            path,
            mtime: 0,
            is_dir: true,
        }
    }
}

/// Row counts of the tree store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    /// Nodes including the root
    pub nodes: u64,
    pub media: u64,
}
