use serde::{Deserialize, Serialize};

/// Phase of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Scanning,
    MetadataExtraction,
    Cleanup,
    Export,
}

/// Progress information for an ongoing sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncProgress {
    pub phase: SyncPhase,
    pub processed: usize,
    pub total: usize,
    pub current_item: Option<String>,
}

/// Callback invoked on every progress update
pub type ProgressCallback = Box<dyn Fn(&SyncProgress) + Send + Sync>;

/// Summary of a completed sync run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSummary {
    pub session_id: String,
    pub started_at: String,
    pub completed_at: String,
    pub duration_ms: u64,
    pub directories_created: usize,
    pub files_created: usize,
    /// Entries removed by the reconciler (descendants go with them)
    pub nodes_deleted: usize,
    pub tasks_queued: usize,
    pub files_refreshed: usize,
    pub files_failed: usize,
    pub orphans_cleaned: usize,
    pub tracks_exported: usize,
    pub albums_exported: usize,
    pub artists_exported: usize,
}
