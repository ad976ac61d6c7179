use crate::{
    cleaner, error::Result, ExportBuilder, ExportGraph, MetadataRefresher, ProgressCallback,
    Reconciler, RefreshOutcome, SyncError, SyncPhase, SyncProgress, SyncSummary, UrlMapper,
};
use shelf_core::{MetadataReader, TreeStore, ROOT_NODE_ID};
use shelf_scanner::LiveDirectory;
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Outcome of a completed run
#[derive(Debug)]
pub struct SyncReport {
    pub summary: SyncSummary,
    pub graph: ExportGraph,
}

/// Orchestrates one sync run: reconcile, refresh, clean up, export
///
/// The store handed to [`SyncManager::run`] is expected to be inside a single
/// transaction owned by the caller. When `run` returns an error the caller
/// must roll back; nothing here commits.
pub struct SyncManager<R> {
    reader: R,
    urls: UrlMapper,
    force_refresh: bool,
    progress: Option<ProgressCallback>,
}

impl<R: MetadataReader> SyncManager<R> {
    pub fn new(reader: R, urls: UrlMapper) -> Self {
        Self {
            reader,
            urls,
            force_refresh: false,
            progress: None,
        }
    }

    /// Re-read metadata for every file, changed or not
    pub fn force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = force;
        self
    }

    /// Set progress callback
    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub async fn run<S, D>(&self, store: &mut S, root: &D) -> Result<SyncReport>
    where
        S: TreeStore + ?Sized,
        D: LiveDirectory,
    {
        let started_at = chrono::Utc::now();
        let start_time = Instant::now();
        let session_id = Uuid::new_v4().to_string();

        info!("Starting sync {}", session_id);

        if store.get_node(ROOT_NODE_ID).await?.is_none() {
            return Err(SyncError::InvalidState("root node is missing".to_string()));
        }

        // Phase 1: Scanning
        debug!("Phase 1: Reconciling tree");
        self.report(SyncPhase::Scanning, 0, 0, None);
        let reconciler = Reconciler::new().force_refresh(self.force_refresh);
        let outcome = match reconciler.sync(store, root).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Scan phase failed: {}", e);
                return Err(e);
            }
        };
        let tasks_queued = outcome.tasks.len();

        // Phase 2: Metadata Extraction
        debug!("Phase 2: Extracting metadata for {} files", tasks_queued);
        let refresher = MetadataRefresher::new(&self.reader);
        let mut files_refreshed = 0;
        let mut files_failed = 0;
        for (index, task) in outcome.tasks.into_iter().enumerate() {
            let current = task.file.path.display().to_string();
            match refresher.execute(store, task).await {
                Ok(RefreshOutcome::Updated) => files_refreshed += 1,
                Ok(RefreshOutcome::Failed) => files_failed += 1,
                Err(e) => {
                    error!("Metadata extraction phase failed at {}: {}", current, e);
                    return Err(e);
                }
            }
            self.report(
                SyncPhase::MetadataExtraction,
                index + 1,
                tasks_queued,
                Some(current),
            );
        }

        // Phase 3: Cleanup Orphans
        debug!("Phase 3: Cleaning up orphans");
        self.report(SyncPhase::Cleanup, 0, 0, None);
        let orphans_cleaned = match cleaner::cleanup_orphans(store).await {
            Ok(count) => count,
            Err(e) => {
                error!("Cleanup phase failed: {}", e);
                return Err(e);
            }
        };

        // Phase 4: Export
        debug!("Phase 4: Building export");
        let graph = match ExportBuilder::new(&self.urls).build_from_store(store).await {
            Ok(graph) => graph,
            Err(e) => {
                error!("Export phase failed: {}", e);
                return Err(e);
            }
        };
        self.report(SyncPhase::Export, graph.files.len(), graph.files.len(), None);

        let summary = SyncSummary {
            session_id,
            started_at: started_at.to_rfc3339(),
            completed_at: chrono::Utc::now().to_rfc3339(),
            duration_ms: start_time.elapsed().as_millis() as u64,
            directories_created: outcome.directories_created,
            files_created: outcome.files_created,
            nodes_deleted: outcome.nodes_deleted,
            tasks_queued,
            files_refreshed,
            files_failed,
            orphans_cleaned,
            tracks_exported: graph.files.len(),
            albums_exported: graph.albums.len(),
            artists_exported: graph.artists.len(),
        };

        info!(
            "Sync complete: {} refreshed, {} failed, {} removed, {} orphans cleaned, {} tracks exported in {}ms",
            summary.files_refreshed,
            summary.files_failed,
            summary.nodes_deleted,
            summary.orphans_cleaned,
            summary.tracks_exported,
            summary.duration_ms
        );

        Ok(SyncReport { summary, graph })
    }

    fn report(&self, phase: SyncPhase, processed: usize, total: usize, current_item: Option<String>) {
        if let Some(callback) = &self.progress {
            callback(&SyncProgress {
                phase,
                processed,
                total,
                current_item,
            });
        }
    }
}
