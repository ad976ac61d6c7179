//! Atomic export writes

use crate::error::Result;
use shelf_sync::ExportGraph;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialize the graph next to `output`, then rename it into place
///
/// Readers of `output` see either the previous export or the new one, never a
/// partial file.
pub fn write_export(graph: &ExportGraph, output: &Path) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        serde_json::to_writer(&mut writer, graph)?;
        writer.flush()?;
    }
    file.as_file().sync_all()?;
    file.persist(output).map_err(|e| e.error)?;

    Ok(())
}
