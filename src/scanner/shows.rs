//! TV show discovery.
//!
//! Episode files live at the show root or one directory below it. Files are
//! grouped into shows by their parsed show name, case-insensitively.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use marquee_common::paths::{file_stem_lossy, is_video_file};
use marquee_common::{Category, IdSequence};
use marquee_parser::normalize::clean_episode_name;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{entry_name, file_stat, sorted_children, LibraryLayout};

/// One episode file. Serialized field names follow the catalog contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Playback handle: `<show_id>_S<season:02>E<episode:02>`.
    #[serde(rename = "eid")]
    pub key: String,
    #[serde(rename = "s")]
    pub season: u32,
    #[serde(rename = "e")]
    pub episode: u32,
    pub title: Option<String>,
    #[serde(rename = "file")]
    pub path: PathBuf,
    pub size: u64,
    pub mtime: f64,
    #[serde(default)]
    pub is_new: bool,
}

impl Episode {
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// Build the playback key for an episode.
pub fn episode_key(show_id: &str, season: u32, episode: u32) -> String {
    format!("{show_id}_S{season:02}E{episode:02}")
}

/// A show with its episodes and enrichment fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowEntity {
    pub id: String,
    pub title: String,
    #[serde(rename = "tv_id")]
    pub tmdb_id: Option<u64>,
    pub poster_url: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub vote: Option<f64>,
    pub first_year: Option<u16>,
    pub cast: Vec<String>,
    pub backdrop_url: String,
    pub tagline: String,
    #[serde(default)]
    pub is_new: bool,
    /// Episodes per season, sorted by episode number.
    pub seasons: BTreeMap<u32, Vec<Episode>>,
}

impl ShowEntity {
    fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            tmdb_id: None,
            poster_url: String::new(),
            overview: String::new(),
            genres: Vec::new(),
            vote: None,
            first_year: None,
            cast: Vec::new(),
            backdrop_url: String::new(),
            tagline: String::new(),
            is_new: false,
            seasons: BTreeMap::new(),
        }
    }

    pub fn episodes(&self) -> impl Iterator<Item = &Episode> {
        self.seasons.values().flatten()
    }

    pub fn episodes_mut(&mut self) -> impl Iterator<Item = &mut Episode> {
        self.seasons.values_mut().flatten()
    }

    pub fn episode_count(&self) -> usize {
        self.seasons.values().map(Vec::len).sum()
    }

    /// Add an episode file, or merge it into an existing (season, episode).
    ///
    /// The larger file wins; a missing title is filled from the other file.
    pub fn add_or_update_episode(
        &mut self,
        season: u32,
        episode: u32,
        title: Option<String>,
        path: &Path,
    ) {
        let stat = file_stat(path);
        let title = title.filter(|t| !t.trim().is_empty());
        let list = self.seasons.entry(season).or_default();

        if let Some(existing) = list.iter_mut().find(|e| e.episode == episode) {
            if stat.size > existing.size {
                existing.path = path.to_path_buf();
                existing.size = stat.size;
                existing.mtime = stat.mtime;
            }
            if !existing.has_title() && title.is_some() {
                existing.title = title;
            }
            return;
        }

        list.push(Episode {
            key: episode_key(&self.id, season, episode),
            season,
            episode,
            title,
            path: path.to_path_buf(),
            size: stat.size,
            mtime: stat.mtime,
            is_new: false,
        });
    }

    fn sort_episodes(&mut self) {
        for list in self.seasons.values_mut() {
            list.sort_by_key(|e| e.episode);
        }
    }
}

/// Result of a show scan: shows in discovery order plus the playback index.
#[derive(Debug, Clone, Default)]
pub struct ShowLibrary {
    pub shows: Vec<ShowEntity>,
    /// Episode key to file path.
    pub episode_index: BTreeMap<String, PathBuf>,
}

impl ShowLibrary {
    pub fn rebuild_index(&mut self) {
        self.episode_index = self
            .shows
            .iter()
            .flat_map(ShowEntity::episodes)
            .map(|e| (e.key.clone(), e.path.clone()))
            .collect();
    }

    pub fn episode_count(&self) -> usize {
        self.shows.iter().map(ShowEntity::episode_count).sum()
    }
}

struct ShowCollector {
    ids: IdSequence,
    shows: Vec<ShowEntity>,
    by_name: HashMap<String, usize>,
}

impl ShowCollector {
    fn handle_file(&mut self, path: &Path, folder_name: Option<&str>) {
        if !is_video_file(path) {
            return;
        }
        let stem = file_stem_lossy(path);
        let Some(parsed) = marquee_parser::parse_episode(&stem) else {
            debug!("Not an episode, skipping: {:?}", path);
            return;
        };

        let show_name = if parsed.show.is_empty() {
            folder_name.map(clean_episode_name).unwrap_or_default()
        } else {
            parsed.show
        };
        if show_name.is_empty() {
            debug!("No show name for episode file, skipping: {:?}", path);
            return;
        }

        let key = show_name.to_lowercase();
        let index = match self.by_name.get(&key) {
            Some(&i) => i,
            None => {
                self.shows.push(ShowEntity::new(self.ids.next_id(), show_name));
                self.by_name.insert(key, self.shows.len() - 1);
                self.shows.len() - 1
            }
        };

        let title = Some(parsed.episode_title);
        self.shows[index].add_or_update_episode(parsed.season, parsed.episode, title, path);
    }
}

/// Scan a show root.
///
/// Video files at the root and one level of subdirectories (both in name
/// order) are candidates; files that do not parse as episodes are skipped.
pub fn scan_shows(root: &Path, layout: &LibraryLayout) -> ShowLibrary {
    if !root.is_dir() {
        warn!("Show root is missing or not a directory: {:?}", root);
        return ShowLibrary::default();
    }

    info!(category = %Category::Shows, "Scanning directory: {:?}", root);
    let mut collector = ShowCollector {
        ids: IdSequence::for_category(Category::Shows),
        shows: Vec::new(),
        by_name: HashMap::new(),
    };

    for child in sorted_children(root) {
        let name = entry_name(&child);
        if layout.is_skipped(&name) {
            continue;
        }
        if child.file_type().is_dir() {
            for file in sorted_children(child.path()) {
                if file.file_type().is_file() {
                    collector.handle_file(file.path(), Some(&name));
                }
            }
        } else if child.file_type().is_file() {
            collector.handle_file(child.path(), None);
        }
    }

    let mut library = ShowLibrary {
        shows: collector.shows,
        episode_index: BTreeMap::new(),
    };
    for show in &mut library.shows {
        show.sort_episodes();
    }
    library.rebuild_index();

    info!(
        shows = library.shows.len(),
        episodes = library.episode_count(),
        "Show scan complete"
    );
    library
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, bytes: usize) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![0u8; bytes]).unwrap();
    }

    #[test]
    fn test_episode_key_format() {
        assert_eq!(episode_key("tv3", 1, 2), "tv3_S01E02");
        assert_eq!(episode_key("tv10", 12, 104), "tv10_S12E104");
    }

    #[test]
    fn test_groups_by_show_name_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("Show Name/Show.Name.S01E02.WEBRip.mp4"), 10);
        write(&root.join("Show Name/show name s01e01 Pilot.mkv"), 10);
        write(&root.join("Other.Show.S02E01.mkv"), 10);
        write(&root.join("Show Name/Show.Name.Featurette.mkv"), 10);
        write(&root.join("Show Name/Show.Name.S01E03.srt"), 10);

        let library = scan_shows(root, &LibraryLayout::default());
        let names: Vec<_> = library.shows.iter().map(|s| (s.id.as_str(), s.title.as_str())).collect();
        assert_eq!(names, vec![("tv1", "Other Show"), ("tv2", "Show Name")]);

        let show = &library.shows[1];
        let eps: Vec<_> = show.seasons[&1].iter().map(|e| (e.episode, e.title.clone())).collect();
        assert_eq!(eps, vec![(1, Some("Pilot".to_string())), (2, None)]);
        assert_eq!(show.seasons[&1][1].key, "tv2_S01E02");
        assert_eq!(library.episode_index.len(), 3);
        assert!(library.episode_index.contains_key("tv1_S02E01"));
    }

    #[test]
    fn test_larger_duplicate_wins_and_title_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("Show/Show.S01E01.The.Pilot.720p.mkv"), 100);
        write(&root.join("Show/Show.S01E01.1080p.mkv"), 500);

        let library = scan_shows(root, &LibraryLayout::default());
        let ep = &library.shows[0].seasons[&1][0];
        assert_eq!(library.shows[0].episode_count(), 1);
        assert_eq!(ep.size, 500);
        assert_eq!(ep.path, root.join("Show/Show.S01E01.1080p.mkv"));
        assert_eq!(ep.title.as_deref(), Some("The Pilot"));
        assert_eq!(library.episode_index["tv1_S01E01"], ep.path);
    }

    #[test]
    fn test_empty_show_name_uses_folder() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("Great_Show/S01E05.mkv"), 10);
        write(&root.join("S09E09.mkv"), 10);

        let library = scan_shows(root, &LibraryLayout::default());
        assert_eq!(library.shows.len(), 1);
        assert_eq!(library.shows[0].title, "Great Show");
    }

    #[test]
    fn test_episodes_sorted_and_deeper_levels_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("Show/Show.S01E10.mkv"), 10);
        write(&root.join("Show/Show.S01E02.mkv"), 10);
        write(&root.join("Show/Season 2/Show.S02E01.mkv"), 10);
        write(&root.join(".trash/Show.S01E03.mkv"), 10);

        let library = scan_shows(root, &LibraryLayout::default());
        let show = &library.shows[0];
        let numbers: Vec<_> = show.episodes().map(|e| (e.season, e.episode)).collect();
        assert_eq!(numbers, vec![(1, 2), (1, 10)]);
    }

    #[test]
    fn test_meta_serialization_names() {
        let mut show = ShowEntity::new("tv1".into(), "Show".into());
        show.seasons.entry(1).or_default().push(Episode {
            key: "tv1_S01E01".into(),
            season: 1,
            episode: 1,
            title: None,
            path: PathBuf::from("/tv/Show.S01E01.mkv"),
            size: 1,
            mtime: 0.0,
            is_new: true,
        });
        let json = serde_json::to_value(&show).unwrap();
        assert!(json["tv_id"].is_null());
        assert_eq!(json["seasons"]["1"][0]["eid"], "tv1_S01E01");
        assert_eq!(json["seasons"]["1"][0]["file"], "/tv/Show.S01E01.mkv");
        assert_eq!(json["seasons"]["1"][0]["is_new"], true);
    }
}
