//! Library statistics written to `summary.json` and printed after a build.

use std::fmt;
use std::path::Path;

use marquee_common::format::format_size;
use marquee_common::paths::is_hidden;
use marquee_common::Category;
use serde::Serialize;
use walkdir::WalkDir;

use crate::scanner::{CatalogEntry, ShowLibrary};

/// Total size of regular files below `root`.
///
/// Hidden entries, symlinks and directories named in `exclude` are skipped. A
/// missing root counts as zero.
pub fn folder_size(root: &Path, exclude: &[&str]) -> u64 {
    if !root.is_dir() {
        return 0;
    }

    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !is_hidden(&name) && !(e.file_type().is_dir() && exclude.contains(&name.as_ref()))
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Byte count alongside its human-readable rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteSize(pub u64);

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_size(self.0))
    }
}

impl Serialize for ByteSize {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("ByteSize", 2)?;
        s.serialize_field("bytes", &self.0)?;
        s.serialize_field("display", &format_size(self.0))?;
        s.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    pub active: usize,
    pub archived: usize,
    pub total: usize,
    pub active_size: ByteSize,
    pub archived_size: ByteSize,
    pub total_size: ByteSize,
    /// Combined size of the entries marked new.
    pub new_size: ByteSize,
}

impl CategoryStats {
    /// Counts come from `entries`; sizes are measured on disk under `root`.
    pub fn collect(
        category: Category,
        entries: &[CatalogEntry],
        root: Option<&Path>,
        output_dir_name: &str,
        archived_dir_name: &str,
        new_ids: &std::collections::HashSet<String>,
    ) -> Self {
        let archived = entries.iter().filter(|e| e.archived).count();
        let (active_bytes, archived_bytes) = match root {
            Some(root) => (
                folder_size(root, &[output_dir_name, archived_dir_name]),
                folder_size(&root.join(archived_dir_name), &[output_dir_name]),
            ),
            None => (0, 0),
        };
        let new_bytes = entries
            .iter()
            .filter(|e| new_ids.contains(&e.id))
            .map(|e| e.size)
            .sum();

        Self {
            category,
            active: entries.len() - archived,
            archived,
            total: entries.len(),
            active_size: ByteSize(active_bytes),
            archived_size: ByteSize(archived_bytes),
            total_size: ByteSize(active_bytes + archived_bytes),
            new_size: ByteSize(new_bytes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowStats {
    pub shows: usize,
    pub episodes: usize,
    pub size: ByteSize,
    /// Combined size of the episodes marked new.
    pub new_size: ByteSize,
}

impl ShowStats {
    pub fn collect(library: &ShowLibrary, root: Option<&Path>, output_dir_name: &str) -> Self {
        let new_bytes = library
            .shows
            .iter()
            .flat_map(|s| s.episodes())
            .filter(|e| e.is_new)
            .map(|e| e.size)
            .sum();

        Self {
            shows: library.shows.len(),
            episodes: library.episode_count(),
            size: ByteSize(root.map_or(0, |r| folder_size(r, &[output_dir_name]))),
            new_size: ByteSize(new_bytes),
        }
    }
}

/// Everything a build reports about the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryStats {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub categories: Vec<CategoryStats>,
    pub shows: ShowStats,
}

impl fmt::Display for LibraryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.categories {
            writeln!(
                f,
                "{:<12} active {} ({}) | archived {} ({}) | total {} ({})",
                c.category.to_string(),
                c.active,
                c.active_size,
                c.archived,
                c.archived_size,
                c.total,
                c.total_size
            )?;
        }
        write!(
            f,
            "{:<12} shows {} | episodes {} ({})",
            Category::Shows.to_string(),
            self.shows.shows,
            self.shows.episodes,
            self.shows.size
        )
    }
}
