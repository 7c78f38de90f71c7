//! Shared test harness for integration tests.
//!
//! Provides [`StubProvider`], a scripted [`MetadataProvider`] that records
//! every call, and [`LibraryFixture`], a temporary library with one root per
//! category plus an output directory.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use marquee::config::Config;
use marquee::metadata::{EpisodeDetails, MetadataProvider, MovieDetails, SearchResult, ShowDetails};

/// A provider call, as observed by [`StubProvider`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SearchMovie { query: String, year: Option<u16> },
    MovieDetails(u64),
    SearchTv(String),
    TvDetails(u64),
    Episode(u64, u32, u32),
}

/// Scripted provider. Searches are matched on the lower-cased query and
/// return their canned results for any year.
#[derive(Default)]
pub struct StubProvider {
    pub available: bool,
    movies: HashMap<String, Vec<SearchResult>>,
    movie_details: HashMap<u64, MovieDetails>,
    shows: HashMap<String, Vec<SearchResult>>,
    show_details: HashMap<u64, ShowDetails>,
    episodes: HashMap<(u64, u32, u32), String>,
    calls: Mutex<Vec<Call>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            available: true,
            ..Default::default()
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn with_movie(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.movies.insert(query.to_lowercase(), results);
        self
    }

    pub fn with_movie_details(mut self, id: u64, details: MovieDetails) -> Self {
        self.movie_details.insert(id, details);
        self
    }

    pub fn with_show(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.shows.insert(query.to_lowercase(), results);
        self
    }

    pub fn with_show_details(mut self, id: u64, details: ShowDetails) -> Self {
        self.show_details.insert(id, details);
        self
    }

    pub fn with_episode(mut self, id: u64, season: u32, episode: u32, name: &str) -> Self {
        self.episodes.insert((id, season, episode), name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MetadataProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn search_movie(&self, query: &str, year: Option<u16>) -> anyhow::Result<Vec<SearchResult>> {
        self.record(Call::SearchMovie {
            query: query.to_string(),
            year,
        });
        Ok(self.movies.get(&query.to_lowercase()).cloned().unwrap_or_default())
    }

    async fn movie_details(&self, id: u64) -> anyhow::Result<MovieDetails> {
        self.record(Call::MovieDetails(id));
        self.movie_details
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no movie {id}"))
    }

    async fn search_tv(&self, query: &str) -> anyhow::Result<Vec<SearchResult>> {
        self.record(Call::SearchTv(query.to_string()));
        Ok(self.shows.get(&query.to_lowercase()).cloned().unwrap_or_default())
    }

    async fn tv_details(&self, id: u64) -> anyhow::Result<ShowDetails> {
        self.record(Call::TvDetails(id));
        self.show_details
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no show {id}"))
    }

    async fn tv_episode_details(&self, id: u64, season: u32, episode: u32) -> anyhow::Result<EpisodeDetails> {
        self.record(Call::Episode(id, season, episode));
        Ok(EpisodeDetails {
            name: self.episodes.get(&(id, season, episode)).cloned(),
        })
    }
}

pub fn search_result(id: u64, title: &str, year: Option<u16>) -> SearchResult {
    SearchResult {
        id,
        title: title.to_string(),
        year,
        overview: Some(format!("Overview of {title}")),
        poster_url: Some(format!("https://image.tmdb.org/t/p/w342/{id}.jpg")),
    }
}

/// Details that leave nothing for a later run to fetch.
pub fn complete_movie_details() -> MovieDetails {
    MovieDetails {
        genres: vec!["Drama".into()],
        runtime: Some(112),
        vote: Some(7.1),
        tagline: Some("Every story has a sequel.".into()),
        backdrop_url: Some("https://image.tmdb.org/t/p/w1280/back.jpg".into()),
        certification: Some("PG-13".into()),
        cast: vec!["Lead Actor".into(), "Second Lead".into()],
    }
}

pub fn complete_show_details() -> ShowDetails {
    ShowDetails {
        genres: vec!["Comedy".into()],
        vote: Some(8.0),
        tagline: Some("A show about names.".into()),
        backdrop_url: Some("https://image.tmdb.org/t/p/w1280/show.jpg".into()),
        first_year: Some(2015),
        cast: vec!["Someone".into()],
    }
}

/// Temporary library with `movies/`, `standup/`, `docs/`, `shows/` and `out/`.
pub struct LibraryFixture {
    dir: TempDir,
}

impl LibraryFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        for name in ["movies", "standup", "docs", "shows"] {
            fs::create_dir_all(dir.path().join(name)).expect("failed to create root");
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn root(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Write `bytes` zero bytes at `relative` (e.g. `"movies/Heat (1995)/heat.mkv"`).
    pub fn file(&self, relative: &str, bytes: usize) -> PathBuf {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).expect("failed to create parent");
        fs::write(&path, vec![0u8; bytes]).expect("failed to write fixture file");
        path
    }

    pub fn read_json(&self, name: &str) -> serde_json::Value {
        let text = fs::read_to_string(self.output_dir().join(name)).expect("missing output file");
        serde_json::from_str(&text).expect("output is not JSON")
    }

    /// Config pointing at every root, with no delays and no asset downloads.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.library.movies_root = Some(self.root("movies"));
        config.library.standup_root = Some(self.root("standup"));
        config.library.docs_root = Some(self.root("docs"));
        config.library.shows_root = Some(self.root("shows"));
        config.library.output_dir = Some(self.output_dir());
        config.tmdb.request_delay_ms = 0;
        config.tmdb.episode_delay_ms = 0;
        config.assets.cache_posters = false;
        config
    }
}
