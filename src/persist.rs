//! Atomic JSON persistence for catalog and cache files.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// The document is written to a temporary file in the same directory and
/// renamed into place, so readers never observe a half-written file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {:?}", parent))?;

    let mut json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {:?}", path))?;
    json.push('\n');

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {:?}", parent))?;
    tmp.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write temp file for {:?}", path))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {:?}", path))?;

    Ok(())
}
