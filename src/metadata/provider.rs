//! Trait definition and types for metadata providers.
//!
//! This module defines the [`MetadataProvider`] trait the enrichment service
//! queries, along with the data types returned by provider calls. Image
//! fields carry fully-qualified URLs; providers resolve their own path
//! fragments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// A single result returned from a search query, in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Provider-specific identifier (e.g. TMDB numeric ID).
    pub id: u64,
    /// Display title, falling back to the original-language title.
    pub title: String,
    /// Release or first-air year, if known.
    pub year: Option<u16>,
    /// Short synopsis.
    pub overview: Option<String>,
    /// Poster image URL, if the provider has one.
    pub poster_url: Option<String>,
}

impl SearchResult {
    pub fn has_poster(&self) -> bool {
        self.poster_url.as_deref().is_some_and(|p| !p.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

/// Detail fields for a movie-like title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub genres: Vec<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Audience rating (0.0 - 10.0).
    pub vote: Option<f64>,
    pub tagline: Option<String>,
    pub backdrop_url: Option<String>,
    /// First non-empty US certification.
    pub certification: Option<String>,
    /// Top-billed cast, at most five names.
    pub cast: Vec<String>,
}

/// Detail fields for a TV show.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowDetails {
    pub genres: Vec<String>,
    pub vote: Option<f64>,
    pub tagline: Option<String>,
    pub backdrop_url: Option<String>,
    pub first_year: Option<u16>,
    /// Top-billed cast, at most five names.
    pub cast: Vec<String>,
}

/// Detail fields for a single episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDetails {
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait that metadata providers implement.
///
/// Search results are returned in the provider's own order: the scorer
/// breaks ties by position, so implementations must not re-sort them.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Returns `true` when credentials are configured.
    fn is_available(&self) -> bool;

    /// Search for movies matching `query`, optionally constrained by `year`.
    async fn search_movie(&self, query: &str, year: Option<u16>)
        -> anyhow::Result<Vec<SearchResult>>;

    /// Fetch genres, runtime, rating, certification, cast, backdrop and tagline.
    async fn movie_details(&self, id: u64) -> anyhow::Result<MovieDetails>;

    /// Search for TV shows matching `query`.
    async fn search_tv(&self, query: &str) -> anyhow::Result<Vec<SearchResult>>;

    /// Fetch genres, rating, first-air year, cast, backdrop and tagline.
    async fn tv_details(&self, id: u64) -> anyhow::Result<ShowDetails>;

    /// Fetch a single episode's details.
    async fn tv_episode_details(
        &self,
        id: u64,
        season: u32,
        episode: u32,
    ) -> anyhow::Result<EpisodeDetails>;
}
