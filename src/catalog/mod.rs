//! Catalog output: the JSON contract consumed by the site and the player.
//!
//! Per movie-like category the pipeline writes `<stem>_index.json` (id to
//! absolute path, entries with a file only) and `<stem>_meta.json`. Shows get
//! `shows_meta.json` and `episodes_index.json`. Every file goes through
//! [`write_json_atomic`].

mod playback;
mod stats;

pub use playback::PlaybackIndex;
pub use stats::{folder_size, ByteSize, CategoryStats, LibraryStats, ShowStats};

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;
use marquee_common::Category;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::MovieRecord;
use crate::persist::write_json_atomic;
use crate::scanner::{CatalogEntry, ShowEntity, ShowLibrary};

pub const SHOWS_META_FILE: &str = "shows_meta.json";
pub const EPISODES_INDEX_FILE: &str = "episodes_index.json";
pub const SUMMARY_FILE: &str = "summary.json";

/// Name of the id → path index for a category.
pub fn index_file_name(category: Category) -> String {
    match category {
        Category::Shows => EPISODES_INDEX_FILE.to_string(),
        other => format!("{}_index.json", other.file_stem()),
    }
}

/// Name of the metadata file for a category.
pub fn meta_file_name(category: Category) -> String {
    match category {
        Category::Shows => SHOWS_META_FILE.to_string(),
        other => format!("{}_meta.json", other.file_stem()),
    }
}

/// One entry of `<stem>_meta.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieMeta {
    pub title: String,
    pub year: Option<u16>,
    /// Local asset path (`posters/<file>`) or the remote URL.
    pub poster_url: String,
    pub overview: String,
    pub archived: bool,
    pub genres: Vec<String>,
    pub runtime: Option<u32>,
    pub vote: Option<f64>,
    pub certification: Option<String>,
    pub cast: Vec<String>,
    pub backdrop_url: String,
    pub tagline: String,
    pub mtime: f64,
    pub is_new: bool,
}

impl MovieMeta {
    pub fn new(entry: &CatalogEntry, record: &MovieRecord) -> Self {
        Self {
            title: entry.title.clone(),
            year: entry.year,
            poster_url: record.poster_url.clone(),
            overview: record.overview.clone(),
            archived: entry.archived,
            genres: record.genres.clone(),
            runtime: record.runtime,
            vote: record.vote,
            certification: record.certification.clone(),
            cast: record.cast.clone(),
            backdrop_url: record.backdrop_url.clone(),
            tagline: record.tagline.clone(),
            mtime: entry.mtime,
            is_new: false,
        }
    }
}

fn newest_first(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Ids of the `limit` most recently modified entries that have a file.
///
/// Equal mtimes keep scan order.
pub fn newest_ids(entries: &[CatalogEntry], limit: usize) -> HashSet<String> {
    let mut with_file: Vec<&CatalogEntry> = entries.iter().filter(|e| e.has_file()).collect();
    with_file.sort_by(|a, b| newest_first(a.mtime, b.mtime));
    with_file.into_iter().take(limit).map(|e| e.id.clone()).collect()
}

/// Mark the `limit` shows with the most recent episode as new, and within
/// each of them the `per_show` most recent episodes.
///
/// Everything else is reset to not new.
pub fn mark_new_shows(shows: &mut [ShowEntity], limit: usize, per_show: usize) {
    let latest = |show: &ShowEntity| show.episodes().map(|e| e.mtime).fold(f64::MIN, f64::max);

    let mut order: Vec<usize> = (0..shows.len())
        .filter(|&i| shows[i].episode_count() > 0)
        .collect();
    order.sort_by(|&a, &b| newest_first(latest(&shows[a]), latest(&shows[b])));
    let new_shows: HashSet<usize> = order.into_iter().take(limit).collect();

    for (i, show) in shows.iter_mut().enumerate() {
        show.is_new = new_shows.contains(&i);

        let mut episodes: Vec<(f64, String)> = show.episodes().map(|e| (e.mtime, e.key.clone())).collect();
        episodes.sort_by(|a, b| newest_first(a.0, b.0));
        let new_keys: HashSet<String> = if show.is_new {
            episodes.into_iter().take(per_show).map(|(_, k)| k).collect()
        } else {
            HashSet::new()
        };

        for ep in show.episodes_mut() {
            ep.is_new = new_keys.contains(&ep.key);
        }
    }
}

/// Build the meta map for a movie-like category. `records` pairs with
/// `entries` by position.
pub fn movie_meta(
    entries: &[CatalogEntry],
    records: &[MovieRecord],
    new_ids: &HashSet<String>,
) -> BTreeMap<String, MovieMeta> {
    entries
        .iter()
        .zip(records)
        .map(|(entry, record)| {
            let mut meta = MovieMeta::new(entry, record);
            meta.is_new = new_ids.contains(&entry.id);
            (entry.id.clone(), meta)
        })
        .collect()
}

/// Write `<stem>_index.json` and `<stem>_meta.json`.
pub fn write_movie_like(
    output_dir: &Path,
    category: Category,
    entries: &[CatalogEntry],
    meta: &BTreeMap<String, MovieMeta>,
) -> Result<()> {
    let index: BTreeMap<&str, &PathBuf> = entries
        .iter()
        .filter_map(|e| e.path.as_ref().map(|p| (e.id.as_str(), p)))
        .collect();

    write_json_atomic(&output_dir.join(index_file_name(category)), &index)?;
    write_json_atomic(&output_dir.join(meta_file_name(category)), meta)?;
    info!(category = %category, entries = meta.len(), playable = index.len(), "Wrote catalog");
    Ok(())
}

/// Write `shows_meta.json` and `episodes_index.json`.
pub fn write_shows(output_dir: &Path, library: &ShowLibrary) -> Result<()> {
    let meta: BTreeMap<&str, &ShowEntity> = library.shows.iter().map(|s| (s.id.as_str(), s)).collect();

    write_json_atomic(&output_dir.join(SHOWS_META_FILE), &meta)?;
    write_json_atomic(&output_dir.join(EPISODES_INDEX_FILE), &library.episode_index)?;
    info!(
        category = %Category::Shows,
        shows = library.shows.len(),
        episodes = library.episode_index.len(),
        "Wrote catalog"
    );
    Ok(())
}

pub fn write_summary(output_dir: &Path, stats: &LibraryStats) -> Result<()> {
    write_json_atomic(&output_dir.join(SUMMARY_FILE), stats)
}
