use crate::error::Result;
use shelf_core::TreeStore;
use tracing::{debug, info};

/// Remove nodes whose parent is gone and records whose node is gone
///
/// Each kind is swept until a pass removes nothing, so chains of orphans
/// (a dangling subtree) are cleared completely. Returns the number of rows
/// removed.
pub async fn cleanup_orphans<S>(store: &mut S) -> Result<usize>
where
    S: TreeStore + ?Sized,
{
    debug!("Starting cleanup phase");

    let mut nodes_removed = 0;
    loop {
        let removed = store.delete_orphan_nodes().await?;
        if removed == 0 {
            break;
        }
        nodes_removed += removed as usize;
    }
    if nodes_removed > 0 {
        info!("Removed {} orphaned nodes", nodes_removed);
    }

    let mut media_removed = 0;
    loop {
        let removed = store.delete_orphan_media().await?;
        if removed == 0 {
            break;
        }
        media_removed += removed as usize;
    }
    if media_removed > 0 {
        info!("Removed {} orphaned metadata records", media_removed);
    }

    let total_cleaned = nodes_removed + media_removed;
    info!("Cleanup complete: removed {} orphaned records", total_cleaned);

    Ok(total_cleaned)
}
