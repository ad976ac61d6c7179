//! Exclusion rules for mirrored entries

use std::collections::HashSet;

/// Companion formats that live next to audio files but are never tracks
const EXCLUDED_EXTENSIONS: &[&str] = &[
    // Images
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff", "ico", "svg", "heic",
    // Subtitles and lyrics
    "srt", "sub", "ass", "ssa", "vtt", "idx", "lrc",
    // Playlists and cue sheets
    "m3u", "m3u8", "pls", "cue", "xspf", "wpl",
    // Archives and disc images
    "zip", "rar", "7z", "tar", "gz", "bz2", "xz", "iso",
    // Video containers
    "mkv", "mp4", "avi", "mov", "wmv", "webm", "m4v", "mpg", "mpeg", "flv",
    // Documents
    "txt", "nfo", "pdf", "doc", "docx", "rtf", "md", "log", "htm", "html", "xml", "url",
    // Checksums and rip logs
    "sfv", "md5", "sha1", "sha256", "ffp", "accurip",
    // Databases and OS droppings
    "db", "sqlite", "ini",
];

/// Decides which directory entries take part in the mirror
///
/// Hidden entries (leading `.`) are skipped for both files and directories.
/// Files are additionally excluded by extension (case-insensitive) and by
/// reserved names such as the export file itself. Directories are never
/// excluded by extension.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    extensions: HashSet<String>,
    reserved_names: Vec<String>,
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self {
            extensions: EXCLUDED_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect(),
            reserved_names: Vec::new(),
        }
    }
}

impl ExclusionFilter {
    /// Create a filter with the default extension list and no reserved names
    pub fn new() -> Self {
        Self::default()
    }

    /// Never mirror files with this name (compared case-insensitively)
    pub fn reserve_name(mut self, name: impl Into<String>) -> Self {
        self.reserved_names.push(name.into().to_lowercase());
        self
    }

    /// Exclude an additional extension (without the leading dot)
    pub fn exclude_extension(mut self, extension: &str) -> Self {
        self.extensions
            .insert(extension.trim_start_matches('.').to_lowercase());
        self
    }

    /// Whether a directory with this name is skipped
    pub fn skips_directory(&self, name: &str) -> bool {
        is_hidden(name)
    }

    /// Whether a file with this name is skipped
    pub fn skips_file(&self, name: &str) -> bool {
        if is_hidden(name) {
            return true;
        }

        let lower = name.to_lowercase();
        if self.reserved_names.iter().any(|reserved| *reserved == lower) {
            return true;
        }

        lower
            .rsplit_once('.')
            .is_some_and(|(_, ext)| self.extensions.contains(ext))
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
