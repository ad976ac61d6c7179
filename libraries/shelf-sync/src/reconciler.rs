//! Diff a live directory tree against the stored tree

use crate::error::Result;
use shelf_core::{NewNode, NodeId, TreeNode, TreeStore, ROOT_NODE_ID};
use shelf_scanner::{DirectoryListing, LiveDirectory, LiveFile};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// A file whose metadata must be (re-)read
///
/// Produced by the reconciler and consumed once by the refresh engine.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTask {
    pub node: TreeNode,
    pub file: LiveFile,
}

/// What one reconciliation pass did
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// Queued refreshes, in depth-first pre-order
    pub tasks: Vec<UpdateTask>,
    pub directories_created: usize,
    pub files_created: usize,
    /// Stored entries removed because they vanished from disk
    pub nodes_deleted: usize,
}

/// Makes the stored tree match the live one
///
/// Per directory level: stale files are purged, then stale directories, then
/// files are reconciled, then missing directories are created. Only after a
/// level is complete are its child directories visited. A rename therefore
/// shows up as a delete followed by a create.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    force_refresh: bool,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue every live file, not just new or modified ones
    pub fn force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = force;
        self
    }

    /// Reconcile the whole tree below `root` against the stored root node
    pub async fn sync<S, D>(&self, store: &mut S, root: &D) -> Result<ReconcileOutcome>
    where
        S: TreeStore + ?Sized,
        D: LiveDirectory,
    {
        let mut outcome = ReconcileOutcome::default();

        let mut pending = self
            .reconcile_level(store, root.read_children(), ROOT_NODE_ID, &mut outcome)
            .await?;
        pending.reverse();

        while let Some((live, node_id)) = pending.pop() {
            let mut children = self
                .reconcile_level(store, live.read_children(), node_id, &mut outcome)
                .await?;
            children.reverse();
            pending.append(&mut children);
        }

        debug!(
            "Reconciled tree: {} directories created, {} files created, {} deleted, {} tasks",
            outcome.directories_created,
            outcome.files_created,
            outcome.nodes_deleted,
            outcome.tasks.len()
        );

        Ok(outcome)
    }

    /// Apply one directory level and return the child pairs to descend into
    async fn reconcile_level<S, D>(
        &self,
        store: &mut S,
        listing: DirectoryListing<D>,
        parent: NodeId,
        outcome: &mut ReconcileOutcome,
    ) -> Result<Vec<(D, NodeId)>>
    where
        S: TreeStore + ?Sized,
        D: LiveDirectory,
    {
        let DirectoryListing { directories, files } = listing;
        let stored = store.children(parent).await?;

        // A stored entry survives only if a live entry of the same kind has
        // the same name and path
        let mut stored_files: HashMap<String, TreeNode> = HashMap::new();
        let mut stored_dirs: HashMap<String, TreeNode> = HashMap::new();
        let mut stale_files = Vec::new();
        let mut stale_dirs = Vec::new();
        {
            let live_files: HashMap<&str, &Path> = files
                .iter()
                .map(|file| (file.name.as_str(), file.path.as_path()))
                .collect();
            let live_dirs: HashMap<&str, &Path> = directories
                .iter()
                .map(|dir| (dir.name(), dir.path()))
                .collect();

            for node in stored {
                let (live, kept, stale) = if node.is_dir {
                    (&live_dirs, &mut stored_dirs, &mut stale_dirs)
                } else {
                    (&live_files, &mut stored_files, &mut stale_files)
                };

                let matches = live
                    .get(node.name.as_str())
                    .is_some_and(|path| *path == node.path.as_path());
                if matches && !kept.contains_key(&node.name) {
                    kept.insert(node.name.clone(), node);
                } else {
                    stale.push(node);
                }
            }
        }

        // 1-2. Purge before creating anything
        for node in stale_files.into_iter().chain(stale_dirs) {
            debug!("Removing {}", node.path.display());
            store.delete_node(node.id).await?;
            outcome.nodes_deleted += 1;
        }

        // 3. Files
        for file in files {
            match stored_files.remove(&file.name) {
                None => {
                    let node = store
                        .create_node(NewNode::file(parent, file.name.clone(), file.path.clone()))
                        .await?;
                    outcome.files_created += 1;
                    outcome.tasks.push(UpdateTask { node, file });
                }
                Some(node) if self.force_refresh || node.mtime < file.mtime => {
                    outcome.tasks.push(UpdateTask { node, file });
                }
                Some(_) => {}
            }
        }

        // 4. Directories
        let mut descend = Vec::with_capacity(directories.len());
        for dir in directories {
            let node = match stored_dirs.remove(dir.name()) {
                Some(node) => node,
                None => {
                    let created = store
                        .create_node(NewNode::directory(
                            parent,
                            dir.name(),
                            dir.path().to_path_buf(),
                        ))
                        .await?;
                    outcome.directories_created += 1;
                    created
                }
            };
            descend.push((dir, node.id));
        }

        Ok(descend)
    }
}
