/// Indexer configuration
use crate::error::{IndexerError, Result};
use serde::{Deserialize, Serialize};
use shelf_scanner::{ExclusionFilter, MountedSource};
use shelf_sync::UrlMapper;
use std::path::{Path, PathBuf};

/// Config file read when no path is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "shelf.yaml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexerConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Where the JSON export is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    /// Re-read metadata for every file on each run
    #[serde(default)]
    pub force_refresh: bool,
}

/// One library root and how it is published
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Absolute local directory
    pub path: PathBuf,

    /// Public URL prefix for files below `path`
    pub url: String,

    /// Virtual sub-path in the merged tree (empty for the root)
    #[serde(default)]
    pub mount: PathBuf,
}

impl IndexerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `shelf.yaml` in the working
    /// directory is read if present. `SHELF_*` environment variables override
    /// file values (`SHELF_DATABASE_URL`, `SHELF_OUTPUT`, `SHELF_FORCE_REFRESH`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(IndexerError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with SHELF_)
        settings = settings.add_source(
            config::Environment::with_prefix("SHELF")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(IndexerError::Config(
                "At least one source directory is required".to_string(),
            ));
        }

        for source in &self.sources {
            if !source.path.is_absolute() {
                return Err(IndexerError::Config(format!(
                    "Source path must be absolute: {}",
                    source.path.display()
                )));
            }
            if source.url.trim().is_empty() {
                return Err(IndexerError::Config(format!(
                    "Source {} has an empty URL prefix",
                    source.path.display()
                )));
            }
        }

        if self.output.file_name().is_none() {
            return Err(IndexerError::Config(format!(
                "Output path has no file name: {}",
                self.output.display()
            )));
        }

        Ok(())
    }

    pub fn mounted_sources(&self) -> Vec<MountedSource> {
        self.sources
            .iter()
            .map(|source| MountedSource::new(&source.path, &source.mount))
            .collect()
    }

    pub fn url_mapper(&self) -> UrlMapper {
        UrlMapper::new(
            self.sources
                .iter()
                .map(|source| (source.path.clone(), source.url.clone())),
        )
    }

    /// Default exclusions plus the export file itself
    pub fn exclusion_filter(&self) -> ExclusionFilter {
        let filter = ExclusionFilter::new();
        match self.output.file_name() {
            Some(name) => filter.reserve_name(name.to_string_lossy()),
            None => filter,
        }
    }
}

// Default values
fn default_database_url() -> String {
    "sqlite://./data/shelf.db".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("./library.json")
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            output: default_output(),
            sources: Vec::new(),
            force_refresh: false,
        }
    }
}
