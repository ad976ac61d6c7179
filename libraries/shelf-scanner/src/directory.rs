//! Directory listings over physical and merged source trees

use crate::{ExclusionFilter, Result, ScanError};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use walkdir::{DirEntry, WalkDir};

/// A file as seen on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveFile {
    pub name: String,
    pub path: PathBuf,
    /// Modification time in whole seconds since the Unix epoch
    pub mtime: i64,
}

/// Immediate children of a directory
#[derive(Debug, Clone)]
pub struct DirectoryListing<D> {
    pub directories: Vec<D>,
    pub files: Vec<LiveFile>,
}

impl<D> Default for DirectoryListing<D> {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            files: Vec::new(),
        }
    }
}

/// A directory that can be listed one level at a time
pub trait LiveDirectory: Sized {
    /// Leaf name (empty for the root)
    fn name(&self) -> &str;

    /// Location of the directory
    fn path(&self) -> &Path;

    /// List child directories and files, in listing order
    fn read_children(&self) -> DirectoryListing<Self>;

    fn child_directories(&self) -> Vec<Self> {
        self.read_children().directories
    }

    fn child_files(&self) -> Vec<LiveFile> {
        self.read_children().files
    }
}

/// One configured source root and where it appears in the virtual tree
///
/// `mount` is a relative path such as `Music/Rock`; an empty mount places the
/// source at the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedSource {
    pub path: PathBuf,
    pub mount: PathBuf,
}

impl MountedSource {
    pub fn new(path: impl Into<PathBuf>, mount: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mount: mount.into(),
        }
    }

    fn segments(&self) -> Result<Vec<String>> {
        let invalid = |reason| ScanError::InvalidMount {
            path: self.path.display().to_string(),
            mount: self.mount.display().to_string(),
            reason,
        };

        let mut segments = Vec::new();
        for component in self.mount.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment.to_str().ok_or_else(|| invalid("not valid UTF-8"))?;
                    segments.push(segment.to_string());
                }
                Component::CurDir => {}
                _ => return Err(invalid("must be a relative path without '..'")),
            }
        }
        Ok(segments)
    }
}

/// A source still being placed, with the mount segments not yet consumed
#[derive(Debug, Clone)]
struct PendingSource {
    path: PathBuf,
    remaining: Vec<String>,
}

#[derive(Debug, Clone)]
enum DirectoryKind {
    Physical,
    Merged(Vec<PendingSource>),
}

/// A filesystem directory, or a virtual directory merging several sources
///
/// Merged directories never contain files; their path is the virtual path
/// below the root (for example `Music/Rock`).
///
/// Symlinks are followed, but a child directory that resolves to one of its
/// own physical ancestors is skipped.
#[derive(Debug, Clone)]
pub struct FsDirectory {
    name: String,
    path: PathBuf,
    kind: DirectoryKind,
    filter: Arc<ExclusionFilter>,
    /// Canonical paths of the physical directories from the source root down
    /// to this one (empty for merged directories)
    lineage: Vec<PathBuf>,
}

impl FsDirectory {
    /// A single physical directory used as the root
    pub fn physical(path: impl Into<PathBuf>, filter: ExclusionFilter) -> Self {
        let path = path.into();
        Self {
            name: String::new(),
            lineage: vec![canonical(&path)],
            path,
            kind: DirectoryKind::Physical,
            filter: Arc::new(filter),
        }
    }

    /// Build the root of the virtual tree from the configured sources
    ///
    /// A single source with an empty mount becomes a plain physical root.
    pub fn from_sources(sources: &[MountedSource], filter: ExclusionFilter) -> Result<Self> {
        if sources.is_empty() {
            return Err(ScanError::NoSources);
        }

        let pending = sources
            .iter()
            .map(|source| {
                Ok(PendingSource {
                    path: source.path.clone(),
                    remaining: source.segments()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(resolve(String::new(), PathBuf::new(), pending, &Arc::new(filter)))
    }

    /// Whether this directory is a virtual merge of several sources
    pub fn is_merged(&self) -> bool {
        matches!(self.kind, DirectoryKind::Merged(_))
    }

    /// Physical child directory, or `None` when it loops back to an ancestor
    fn child(&self, name: String, path: PathBuf) -> Option<Self> {
        let resolved = canonical(&path);
        if self.lineage.contains(&resolved) {
            tracing::warn!(
                "Skipping {}: links back to {}",
                path.display(),
                resolved.display()
            );
            return None;
        }

        let mut lineage = self.lineage.clone();
        lineage.push(resolved);
        Some(Self {
            name,
            path,
            kind: DirectoryKind::Physical,
            filter: Arc::clone(&self.filter),
            lineage,
        })
    }

    fn read_physical(&self) -> DirectoryListing<Self> {
        let mut listing = DirectoryListing::default();

        let walker = WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", self.path.display(), e);
                    continue;
                }
            };

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("Skipping non UTF-8 file name: {}", entry.path().display());
                continue;
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if self.filter.skips_directory(&name) {
                    continue;
                }
                if let Some(child) = self.child(name, entry.path().to_path_buf()) {
                    listing.directories.push(child);
                }
            } else if file_type.is_file() {
                if self.filter.skips_file(&name) {
                    continue;
                }
                match modified_seconds(&entry) {
                    Ok(mtime) => listing.files.push(LiveFile {
                        name,
                        path: entry.path().to_path_buf(),
                        mtime,
                    }),
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                    }
                }
            }
        }

        listing
    }

    fn read_merged(&self, sources: &[PendingSource]) -> DirectoryListing<Self> {
        // Group on the first remaining segment, keeping first-occurrence order
        let mut groups: Vec<(String, Vec<PendingSource>)> = Vec::new();
        for source in sources {
            let Some((first, rest)) = source.remaining.split_first() else {
                continue;
            };
            let stripped = PendingSource {
                path: source.path.clone(),
                remaining: rest.to_vec(),
            };
            match groups.iter().position(|(key, _)| key == first) {
                Some(index) => groups[index].1.push(stripped),
                None => groups.push((first.clone(), vec![stripped])),
            }
        }

        let mut listing = DirectoryListing::default();
        for (segment, members) in groups {
            let path = self.path.join(&segment);
            let directory = resolve(segment, path, members, &self.filter);

            if !directory.is_merged() && !directory.path.is_dir() {
                tracing::debug!("Source directory missing: {}", directory.path.display());
                continue;
            }
            listing.directories.push(directory);
        }

        listing
    }
}

impl LiveDirectory for FsDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn read_children(&self) -> DirectoryListing<Self> {
        match &self.kind {
            DirectoryKind::Physical => self.read_physical(),
            DirectoryKind::Merged(sources) => self.read_merged(sources),
        }
    }
}

/// A source ending exactly here wins the whole segment; otherwise merge
fn resolve(
    name: String,
    virtual_path: PathBuf,
    sources: Vec<PendingSource>,
    filter: &Arc<ExclusionFilter>,
) -> FsDirectory {
    let terminal = sources.iter().position(|source| source.remaining.is_empty());
    let (path, kind, lineage) = match terminal {
        Some(index) => {
            let path = sources[index].path.clone();
            let lineage = vec![canonical(&path)];
            (path, DirectoryKind::Physical, lineage)
        }
        None => (virtual_path, DirectoryKind::Merged(sources), Vec::new()),
    };

    FsDirectory {
        name,
        path,
        kind,
        filter: Arc::clone(filter),
        lineage,
    }
}

/// Resolved location of a directory, or the path itself if it cannot be resolved
fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn modified_seconds(entry: &DirEntry) -> std::io::Result<i64> {
    let modified = entry.metadata().map_err(std::io::Error::from)?.modified()?;
    let seconds = match modified.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    };
    Ok(seconds)
}
