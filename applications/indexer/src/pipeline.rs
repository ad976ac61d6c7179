//! One indexing run: open the database, sync inside a transaction, export

use crate::config::IndexerConfig;
use crate::error::Result;
use crate::export_file::write_export;
use shelf_metadata::LoftyMetadataReader;
use shelf_scanner::FsDirectory;
use shelf_storage::SqliteTreeStore;
use shelf_sync::{ProgressCallback, SyncManager, SyncReport};
use std::path::Path;
use tracing::{info, warn};

/// Command-line switches layered on top of the configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub force_refresh: bool,
    /// Roll back at the end and leave the export untouched
    pub dry_run: bool,
}

/// Run a full sync and write the export
///
/// Configuration and connection problems fail before any transaction is
/// opened. A sync error rolls the transaction back, so the database keeps the
/// state of the previous successful run.
pub async fn run(
    config: &IndexerConfig,
    options: RunOptions,
    progress: Option<ProgressCallback>,
) -> Result<SyncReport> {
    config.validate()?;
    let root = FsDirectory::from_sources(&config.mounted_sources(), config.exclusion_filter())?;

    ensure_database_dir(&config.database_url)?;
    let pool = shelf_storage::create_pool(&config.database_url).await?;
    shelf_storage::run_migrations(&pool).await?;
    info!("Database connected");

    let mut manager = SyncManager::new(LoftyMetadataReader::new(), config.url_mapper())
        .force_refresh(options.force_refresh || config.force_refresh);
    if let Some(callback) = progress {
        manager = manager.on_progress(callback);
    }

    let mut store = SqliteTreeStore::begin(&pool).await?;
    let report = match manager.run(&mut store, &root).await {
        Ok(report) => report,
        Err(e) => {
            if let Err(rollback) = store.rollback().await {
                warn!("Rollback failed: {}", rollback);
            }
            pool.close().await;
            return Err(e.into());
        }
    };

    if options.dry_run {
        store.rollback().await?;
        info!("Dry run: changes rolled back, export not written");
    } else {
        store.commit().await?;
        write_export(&report.graph, &config.output)?;
        info!(
            "Wrote {} tracks to {}",
            report.graph.files.len(),
            config.output.display()
        );
    }

    pool.close().await;
    Ok(report)
}

/// SQLite creates the database file but not its directory
fn ensure_database_dir(database_url: &str) -> Result<()> {
    let Some(location) = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };

    let file = location.split('?').next().unwrap_or_default();
    if file.is_empty() || file == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = Path::new(file).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
