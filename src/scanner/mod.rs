//! Media library scanner.
//!
//! Walks the category roots and turns loosely named folders and files into
//! catalog entries. Movie-like categories yield one entry per child of the
//! root; shows are scanned by [`scan_shows`]. The scan never fails: unreadable
//! entries are skipped and failed stats read as zero.

mod shows;

pub use shows::{scan_shows, Episode, ShowEntity, ShowLibrary};

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use marquee_common::paths::{file_stem_lossy, is_hidden, is_video_file};
use marquee_common::{Category, IdSequence};
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::LibraryConfig;

/// Directory names the scanner treats specially.
#[derive(Debug, Clone)]
pub struct LibraryLayout {
    /// Pipeline output directory; never scanned.
    pub output_dir_name: String,
    /// Archive subdirectory; scanned after the active listing.
    pub archived_dir_name: String,
}

impl Default for LibraryLayout {
    fn default() -> Self {
        Self::from(&LibraryConfig::default())
    }
}

impl From<&LibraryConfig> for LibraryLayout {
    fn from(config: &LibraryConfig) -> Self {
        Self {
            output_dir_name: config.output_dir_name.clone(),
            archived_dir_name: config.archived_dir_name.clone(),
        }
    }
}

impl LibraryLayout {
    fn is_skipped(&self, name: &str) -> bool {
        is_hidden(name) || name == self.output_dir_name
    }
}

/// One discovered movie, special, or documentary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub year: Option<u16>,
    /// Video file backing the entry. `None` for a folder without a video.
    pub path: Option<PathBuf>,
    /// Video path relative to the category root, empty without a video.
    pub relative_path: String,
    /// Folder or file name the identity was parsed from.
    pub source_name: String,
    pub archived: bool,
    /// Modification time of the video file, seconds since the epoch.
    pub mtime: f64,
    pub size: u64,
}

impl CatalogEntry {
    pub fn has_file(&self) -> bool {
        self.path.is_some()
    }
}

/// Size and modification time of a file, zero when it cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FileStat {
    pub size: u64,
    pub mtime: f64,
}

pub fn file_stat(path: &Path) -> FileStat {
    match std::fs::metadata(path) {
        Ok(meta) => FileStat {
            size: meta.len(),
            mtime: meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map_or(0.0, |d| d.as_secs_f64()),
        },
        Err(e) => {
            debug!("Failed to stat {:?}: {}", path, e);
            FileStat::default()
        }
    }
}

/// Immediate children of `dir`, sorted by name. Unreadable entries are skipped.
pub(crate) fn sorted_children(dir: &Path) -> Vec<DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("Skipping unreadable entry in {:?}: {}", dir, err);
                None
            }
        })
        .collect()
}

pub(crate) fn entry_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}

/// Largest video file directly inside `dir` (subdirectories are not searched).
pub fn largest_video(dir: &Path) -> Option<(PathBuf, FileStat)> {
    let mut best: Option<(PathBuf, FileStat)> = None;
    for entry in sorted_children(dir) {
        if !entry.file_type().is_file() || is_hidden(&entry_name(&entry)) {
            continue;
        }
        if !is_video_file(entry.path()) {
            continue;
        }
        let stat = file_stat(entry.path());
        if best.as_ref().map_or(true, |(_, b)| stat.size > b.size) {
            best = Some((entry.into_path(), stat));
        }
    }
    best
}

/// Scan a movie-like category root.
///
/// Children are visited in name order. The archive subdirectory is left out
/// of the active listing and scanned afterwards with `archived = true`,
/// continuing the same id sequence.
pub fn scan_movie_like(root: &Path, category: Category, layout: &LibraryLayout) -> Vec<CatalogEntry> {
    if !root.is_dir() {
        warn!(category = %category, "Library root is missing or not a directory: {:?}", root);
        return Vec::new();
    }

    info!(category = %category, "Scanning directory: {:?}", root);
    let mut ids = IdSequence::for_category(category);
    let mut entries = scan_pool(root, root, false, layout, &mut ids);

    let archive = root.join(&layout.archived_dir_name);
    if archive.is_dir() {
        entries.extend(scan_pool(root, &archive, true, layout, &mut ids));
    }

    info!(
        category = %category,
        entries = entries.len(),
        archived = entries.iter().filter(|e| e.archived).count(),
        "Scan complete"
    );
    entries
}

fn scan_pool(
    root: &Path,
    dir: &Path,
    archived: bool,
    layout: &LibraryLayout,
    ids: &mut IdSequence,
) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    for child in sorted_children(dir) {
        let name = entry_name(&child);
        if layout.is_skipped(&name) || (!archived && name == layout.archived_dir_name) {
            continue;
        }

        let (identity_name, video) = if child.file_type().is_dir() {
            let video = largest_video(child.path());
            if video.is_none() {
                debug!("No video file in {:?}", child.path());
            }
            (name.clone(), video)
        } else if child.file_type().is_file() && is_video_file(child.path()) {
            let stat = file_stat(child.path());
            (file_stem_lossy(child.path()), Some((child.path().to_path_buf(), stat)))
        } else {
            continue;
        };

        let identity = marquee_parser::parse_movie(&identity_name);
        let (path, stat) = match video {
            Some((path, stat)) => (Some(path), stat),
            None => (None, FileStat::default()),
        };
        let relative_path = path
            .as_deref()
            .and_then(|p| p.strip_prefix(root).ok())
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        entries.push(CatalogEntry {
            id: ids.next_id(),
            title: identity.title,
            year: identity.year,
            path,
            relative_path,
            source_name: name,
            archived,
            mtime: stat.mtime,
            size: stat.size,
        });
    }

    entries
}
