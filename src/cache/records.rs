//! Typed cache records and the fill-if-empty merge.
//!
//! Field names match the on-disk cache written by earlier runs, so existing
//! cache files keep loading.

use serde::{Deserialize, Serialize};

/// Cached provider data for a movie, stand-up special, or documentary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(default)]
    pub movie_id: Option<u64>,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote: Option<f64>,
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub backdrop_url: String,
    #[serde(default)]
    pub tagline: String,
}

/// Cached provider data for a TV show.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowRecord {
    #[serde(default)]
    pub tv_id: Option<u64>,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub vote: Option<f64>,
    #[serde(default)]
    pub first_year: Option<u16>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub backdrop_url: String,
    #[serde(default)]
    pub tagline: String,
}

impl MovieRecord {
    /// Details are complete once genres, runtime, rating, certification and
    /// cast are all populated.
    pub fn needs_details(&self) -> bool {
        !(!self.genres.is_empty()
            && self.runtime.is_some()
            && self.vote.is_some()
            && has_text(&self.certification)
            && !self.cast.is_empty())
    }

    /// Whether a provider search should run for this record.
    pub fn needs_search(&self) -> bool {
        self.movie_id.is_none()
            || self.needs_details()
            || self.poster_url.is_empty()
            || self.overview.is_empty()
    }

    /// Whether the detail endpoint should be queried, given the
    /// `needs_details` value computed before any search.
    pub fn needs_detail_fetch(&self, needed_details: bool) -> bool {
        self.movie_id.is_some()
            && (needed_details || self.backdrop_url.is_empty() || self.tagline.is_empty())
    }

    /// Copy every field of `other` whose counterpart here is still empty.
    pub fn fill_from(&mut self, other: &MovieRecord) {
        fill_option(&mut self.movie_id, &other.movie_id);
        fill_string(&mut self.poster_url, &other.poster_url);
        fill_string(&mut self.overview, &other.overview);
        fill_list(&mut self.genres, &other.genres);
        fill_option(&mut self.runtime, &other.runtime);
        fill_option(&mut self.vote, &other.vote);
        fill_text_option(&mut self.certification, &other.certification);
        fill_list(&mut self.cast, &other.cast);
        fill_string(&mut self.backdrop_url, &other.backdrop_url);
        fill_string(&mut self.tagline, &other.tagline);
    }
}

impl ShowRecord {
    pub fn needs_details(&self) -> bool {
        !(!self.genres.is_empty()
            && self.vote.is_some()
            && self.first_year.is_some()
            && !self.cast.is_empty())
    }

    pub fn needs_search(&self) -> bool {
        self.tv_id.is_none()
            || self.needs_details()
            || self.poster_url.is_empty()
            || self.overview.is_empty()
    }

    pub fn needs_detail_fetch(&self, needed_details: bool) -> bool {
        self.tv_id.is_some()
            && (needed_details || self.backdrop_url.is_empty() || self.tagline.is_empty())
    }

    pub fn fill_from(&mut self, other: &ShowRecord) {
        fill_option(&mut self.tv_id, &other.tv_id);
        fill_string(&mut self.poster_url, &other.poster_url);
        fill_string(&mut self.overview, &other.overview);
        fill_list(&mut self.genres, &other.genres);
        fill_option(&mut self.vote, &other.vote);
        fill_option(&mut self.first_year, &other.first_year);
        fill_list(&mut self.cast, &other.cast);
        fill_string(&mut self.backdrop_url, &other.backdrop_url);
        fill_string(&mut self.tagline, &other.tagline);
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn fill_option<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
    if dst.is_none() {
        dst.clone_from(src);
    }
}

fn fill_text_option(dst: &mut Option<String>, src: &Option<String>) {
    if !has_text(dst) && has_text(src) {
        *dst = src.as_deref().map(|s| s.trim().to_string());
    }
}

fn fill_string(dst: &mut String, src: &str) {
    let src = src.trim();
    if dst.trim().is_empty() && !src.is_empty() {
        *dst = src.to_string();
    }
}

fn fill_list(dst: &mut Vec<String>, src: &[String]) {
    if dst.is_empty() && !src.is_empty() {
        *dst = src.to_vec();
    }
}
