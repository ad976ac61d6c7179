/// Shelf Indexer - mirror music folders into SQLite and export the library
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use shelf_indexer::{pipeline, IndexerConfig, RunOptions};
use shelf_sync::{SyncPhase, SyncProgress};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelf-indexer")]
#[command(about = "Mirror music folders into a database and export the library", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./shelf.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Re-read metadata for every file, changed or not
    #[arg(long)]
    force: bool,

    /// Run the whole sync, then roll back and skip writing the export
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the progress line on stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelf_indexer=info,shelf_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = IndexerConfig::load(cli.config.as_deref())?;
    let options = RunOptions {
        force_refresh: cli.force,
        dry_run: cli.dry_run,
    };

    let bar = progress_bar();
    let progress_bar = bar.clone();
    let report = pipeline::run(
        &config,
        options,
        Some(Box::new(move |progress: &SyncProgress| {
            if progress.phase == SyncPhase::MetadataExtraction {
                progress_bar.set_length(progress.total as u64);
                progress_bar.set_position(progress.processed as u64);
            }
        })),
    )
    .await;

    match report {
        Ok(report) => {
            bar.finish_with_message("done");
            tracing::info!(
                "{} files refreshed, {} failed, {} tracks, {} albums, {} artists",
                report.summary.files_refreshed,
                report.summary.files_failed,
                report.summary.tracks_exported,
                report.summary.albums_exported,
                report.summary.artists_exported
            );
            Ok(())
        }
        Err(e) => {
            bar.abandon();
            Err(e.into())
        }
    }
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stdout());
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}
