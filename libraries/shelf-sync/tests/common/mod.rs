//! Shared fixtures for sync tests
//!
//! `VirtualDir` is an in-memory directory tree implementing `LiveDirectory`,
//! and `FakeReader` returns canned tags (or failures) by file name.

#![allow(dead_code)]

use shelf_core::{MetadataReader, NodeId, ShelfError, TrackMetadata, TreeStore, ROOT_NODE_ID};
use shelf_scanner::{DirectoryListing, LiveDirectory, LiveFile};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct VirtualDir {
    name: String,
    path: PathBuf,
    dirs: Vec<VirtualDir>,
    files: Vec<LiveFile>,
}

impl VirtualDir {
    pub fn root(path: &str) -> Self {
        Self {
            name: String::new(),
            path: PathBuf::from(path),
            dirs: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn file(mut self, name: &str, mtime: i64) -> Self {
        self.files.push(LiveFile {
            name: name.to_string(),
            path: self.path.join(name),
            mtime,
        });
        self
    }

    pub fn dir(mut self, name: &str, build: impl FnOnce(VirtualDir) -> VirtualDir) -> Self {
        let child = VirtualDir {
            name: name.to_string(),
            path: self.path.join(name),
            dirs: Vec::new(),
            files: Vec::new(),
        };
        self.dirs.push(build(child));
        self
    }

    /// Add a file at a `/`-separated relative path, creating directories
    pub fn insert(&mut self, relative: &str, mtime: i64) {
        let segments: Vec<&str> = relative.split('/').collect();
        let (file, dirs) = segments.split_last().expect("empty path");

        let mut current = self;
        for segment in dirs {
            let index = match current.dirs.iter().position(|d| d.name == *segment) {
                Some(index) => index,
                None => {
                    let path = current.path.join(segment);
                    current.dirs.push(VirtualDir {
                        name: (*segment).to_string(),
                        path,
                        dirs: Vec::new(),
                        files: Vec::new(),
                    });
                    current.dirs.len() - 1
                }
            };
            current = &mut current.dirs[index];
        }

        current.files.retain(|f| f.name != *file);
        current.files.push(LiveFile {
            name: (*file).to_string(),
            path: current.path.join(file),
            mtime,
        });
    }

    /// Every entry as (relative path, is_dir)
    pub fn shape(&self) -> BTreeSet<(String, bool)> {
        let mut shape = BTreeSet::new();
        self.collect_shape("", &mut shape);
        shape
    }

    fn collect_shape(&self, prefix: &str, shape: &mut BTreeSet<(String, bool)>) {
        for file in &self.files {
            shape.insert((format!("{prefix}{}", file.name), false));
        }
        for dir in &self.dirs {
            let relative = format!("{prefix}{}", dir.name);
            shape.insert((relative.clone(), true));
            dir.collect_shape(&format!("{relative}/"), shape);
        }
    }
}

impl LiveDirectory for VirtualDir {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn read_children(&self) -> DirectoryListing<Self> {
        DirectoryListing {
            directories: self.dirs.clone(),
            files: self.files.clone(),
        }
    }
}

/// Shape of the stored tree as (relative path, is_dir), built from names only
pub async fn stored_shape<S: TreeStore>(store: &mut S) -> BTreeSet<(String, bool)> {
    let mut shape = BTreeSet::new();
    let mut pending: Vec<(NodeId, String)> = vec![(ROOT_NODE_ID, String::new())];

    while let Some((id, prefix)) = pending.pop() {
        for child in store.children(id).await.unwrap() {
            let relative = format!("{prefix}{}", child.name);
            if child.is_dir {
                pending.push((child.id, format!("{relative}/")));
            }
            shape.insert((relative, child.is_dir));
        }
    }

    shape
}

/// Metadata reader returning canned results keyed by file name
#[derive(Clone, Default)]
pub struct FakeReader {
    tags: Arc<Mutex<HashMap<String, TrackMetadata>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    reads: Arc<AtomicUsize>,
}

impl FakeReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(self, file_name: &str, title: Option<&str>, artist: Option<&str>) -> Self {
        self.set_tags(
            file_name,
            TrackMetadata {
                title: title.map(str::to_string),
                artist: artist.map(str::to_string),
                ..TrackMetadata::new()
            },
        );
        self
    }

    pub fn set_tags(&self, file_name: &str, metadata: TrackMetadata) {
        self.tags
            .lock()
            .unwrap()
            .insert(file_name.to_string(), metadata);
    }

    pub fn fail(&self, file_name: &str) {
        self.failing.lock().unwrap().insert(file_name.to_string());
    }

    pub fn heal(&self, file_name: &str) {
        self.failing.lock().unwrap().remove(file_name);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl MetadataReader for FakeReader {
    fn read(&self, path: &Path) -> shelf_core::Result<TrackMetadata> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.failing.lock().unwrap().contains(&name) {
            return Err(ShelfError::metadata(format!("corrupt frame in {name}")));
        }

        Ok(self
            .tags
            .lock()
            .unwrap()
            .get(&name)
            .cloned()
            .unwrap_or_default())
    }
}
