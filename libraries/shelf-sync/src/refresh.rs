//! Execute queued metadata refreshes

use crate::error::Result;
use crate::reconciler::UpdateTask;
use shelf_core::{MediaRecord, MetadataReader, TreeStore};
use tracing::{debug, warn};

/// Result of one refresh task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Tags were read and stored; the node carries the file's mtime
    Updated,
    /// Extraction failed; any old record is gone and the node's mtime is 0
    Failed,
}

/// Reads tags for changed files and writes them to the store
pub struct MetadataRefresher<'a, R: ?Sized> {
    reader: &'a R,
}

impl<'a, R> MetadataRefresher<'a, R>
where
    R: MetadataReader + ?Sized,
{
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Consume one task
    ///
    /// Reader errors are absorbed: the record is dropped and the mtime reset
    /// to 0 so the next run retries the file. Store errors are returned.
    pub async fn execute<S>(&self, store: &mut S, task: UpdateTask) -> Result<RefreshOutcome>
    where
        S: TreeStore + ?Sized,
    {
        let UpdateTask { node, file } = task;

        match self.reader.read(&file.path) {
            Ok(metadata) => {
                let record = MediaRecord::from_metadata(node.id, &file.name, metadata);
                store.upsert_media(&record).await?;
                store.set_mtime(node.id, file.mtime).await?;

                debug!("Updated metadata for {}", file.path.display());
                Ok(RefreshOutcome::Updated)
            }
            Err(e) => {
                let had_record = store.delete_media(node.id).await?;
                store.set_mtime(node.id, 0).await?;

                warn!(
                    "Failed to read metadata from {}: {}{}",
                    file.path.display(),
                    e,
                    if had_record { " (stale record removed)" } else { "" }
                );
                Ok(RefreshOutcome::Failed)
            }
        }
    }
}
