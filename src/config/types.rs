use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use marquee_common::Category;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    #[serde(default)]
    pub movies_root: Option<PathBuf>,

    #[serde(default)]
    pub shows_root: Option<PathBuf>,

    #[serde(default)]
    pub standup_root: Option<PathBuf>,

    #[serde(default)]
    pub docs_root: Option<PathBuf>,

    /// Where catalog, cache and asset files are written. Defaults to
    /// `<first configured root>/<output_dir_name>`.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Directory name skipped while scanning, so the output never indexes itself.
    #[serde(default = "default_output_dir_name")]
    pub output_dir_name: String,

    /// Subdirectory holding archived titles, scanned after the active listing.
    #[serde(default = "default_archived_dir_name")]
    pub archived_dir_name: String,
}

fn default_output_dir_name() -> String {
    "_cinema_site".to_string()
}

fn default_archived_dir_name() -> String {
    "0-ARCHIVED".to_string()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            movies_root: None,
            shows_root: None,
            standup_root: None,
            docs_root: None,
            output_dir: None,
            output_dir_name: default_output_dir_name(),
            archived_dir_name: default_archived_dir_name(),
        }
    }
}

impl LibraryConfig {
    /// Root directory configured for a category.
    pub fn root(&self, category: Category) -> Option<&Path> {
        match category {
            Category::Movies => self.movies_root.as_deref(),
            Category::Standup => self.standup_root.as_deref(),
            Category::Documentary => self.docs_root.as_deref(),
            Category::Shows => self.shows_root.as_deref(),
        }
    }

    /// Configured roots in processing order (movies, stand-up, docs, shows).
    pub fn roots(&self) -> impl Iterator<Item = (Category, &Path)> {
        Category::MOVIE_LIKE
            .into_iter()
            .chain([Category::Shows])
            .filter_map(|c| self.root(c).map(|p| (c, p)))
    }

    pub fn has_any_root(&self) -> bool {
        self.roots().next().is_some()
    }

    /// Resolved output directory, if one can be determined.
    pub fn resolved_output_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.output_dir {
            return Some(dir.clone());
        }
        self.roots()
            .next()
            .map(|(_, root)| root.join(&self.output_dir_name))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// v4 read access token, sent as `Authorization: Bearer`. Preferred over `api_key`.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// v3 API key, sent as the `api_key` query parameter.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    #[serde(default = "default_poster_size")]
    pub poster_size: String,

    #[serde(default = "default_backdrop_size")]
    pub backdrop_size: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Pause after each title that made provider calls.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Pause after each episode title lookup.
    #[serde(default = "default_episode_delay_ms")]
    pub episode_delay_ms: u64,
}

fn default_language() -> String {
    "en-US".to_string()
}
fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}
fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}
fn default_poster_size() -> String {
    "w342".to_string()
}
fn default_backdrop_size() -> String {
    "w1280".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_requests_per_second() -> u32 {
    4
}
fn default_request_delay_ms() -> u64 {
    120
}
fn default_episode_delay_ms() -> u64 {
    100
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            api_key: None,
            language: default_language(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            poster_size: default_poster_size(),
            backdrop_size: default_backdrop_size(),
            timeout_secs: default_timeout_secs(),
            requests_per_second: default_requests_per_second(),
            request_delay_ms: default_request_delay_ms(),
            episode_delay_ms: default_episode_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// Download posters into the output directory.
    #[serde(default = "default_true")]
    pub cache_posters: bool,

    /// Download backdrops into the output directory.
    #[serde(default)]
    pub cache_backdrops: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            cache_posters: true,
            cache_backdrops: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Most recently modified titles marked new per category.
    #[serde(default = "default_new_items_limit")]
    pub new_items_limit: usize,

    /// Latest episodes marked new within each new show.
    #[serde(default = "default_new_episodes_per_show")]
    pub new_episodes_per_show: usize,
}

fn default_new_items_limit() -> usize {
    16
}
fn default_new_episodes_per_show() -> usize {
    5
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            new_items_limit: default_new_items_limit(),
            new_episodes_per_show: default_new_episodes_per_show(),
        }
    }
}
