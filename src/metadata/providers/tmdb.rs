//! TMDB (The Movie Database) metadata provider.
//!
//! Implements [`MetadataProvider`] by querying the TMDB v3 REST API.
//!
//! Features:
//! - Bearer-token authentication, falling back to an `api_key` query parameter.
//! - Token-bucket rate limiting via [`governor`] (4 requests / second by default).
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - Configurable request timeout (15 seconds by default).

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TmdbConfig;
use crate::metadata::provider::{
    EpisodeDetails, MetadataProvider, MovieDetails, SearchResult, ShowDetails,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAX_RETRIES: u32 = 3;
const CAST_LIMIT: usize = 5;
const CERTIFICATION_COUNTRY: &str = "US";

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieSearchResult {
    id: u64,
    title: Option<String>,
    original_title: Option<String>,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvSearchResult {
    id: u64,
    name: Option<String>,
    original_name: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetail {
    genres: Option<Vec<TmdbGenre>>,
    runtime: Option<u32>,
    vote_average: Option<f64>,
    tagline: Option<String>,
    backdrop_path: Option<String>,
    release_dates: Option<TmdbReleaseDates>,
    credits: Option<TmdbCredits>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvDetail {
    genres: Option<Vec<TmdbGenre>>,
    vote_average: Option<f64>,
    tagline: Option<String>,
    backdrop_path: Option<String>,
    first_air_date: Option<String>,
    credits: Option<TmdbCredits>,
}

#[derive(Debug, Deserialize)]
struct TmdbEpisodeDetail {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbReleaseDates {
    #[serde(default)]
    results: Vec<TmdbCountryReleases>,
}

#[derive(Debug, Deserialize)]
struct TmdbCountryReleases {
    iso_3166_1: Option<String>,
    #[serde(default)]
    release_dates: Vec<TmdbRelease>,
}

#[derive(Debug, Deserialize)]
struct TmdbRelease {
    certification: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbCredits {
    #[serde(default)]
    cast: Vec<TmdbCastMember>,
}

#[derive(Debug, Deserialize)]
struct TmdbCastMember {
    name: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// How requests authenticate against TMDB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `Authorization: Bearer <token>` header.
    Bearer(String),
    /// `api_key=<key>` query parameter.
    ApiKey(String),
    /// Nothing configured; every call fails and enrichment degrades.
    Missing,
}

impl Credentials {
    /// Pick credentials from config, preferring the bearer token.
    pub fn from_config(config: &TmdbConfig) -> Self {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        if let Some(token) = non_empty(&config.bearer_token) {
            Self::Bearer(token)
        } else if let Some(key) = non_empty(&config.api_key) {
            Self::ApiKey(key)
        } else {
            Self::Missing
        }
    }
}

/// TMDB metadata provider.
///
/// Wraps the TMDB v3 REST API with built-in rate limiting and retry logic.
/// Search results keep TMDB's ordering.
///
/// # Examples
///
/// ```no_run
/// use marquee::config::TmdbConfig;
/// use marquee::metadata::providers::TmdbProvider;
///
/// let config = TmdbConfig {
///     bearer_token: Some("your-token".into()),
///     ..Default::default()
/// };
/// let provider = TmdbProvider::new(&config).unwrap();
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    credentials: Credentials,
    language: String,
    base_url: String,
    image_base_url: String,
    poster_size: String,
    backdrop_size: String,
    rate_limiter: DefaultDirectRateLimiter,
}

impl TmdbProvider {
    /// Create a provider from the `[tmdb]` config section.
    pub fn new(config: &TmdbConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build TMDB HTTP client")?;

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(per_second));

        Ok(Self {
            client,
            credentials: Credentials::from_config(config),
            language: config.language.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            poster_size: config.poster_size.clone(),
            backdrop_size: config.backdrop_size.clone(),
            rate_limiter,
        })
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get(&self, url: &str) -> anyhow::Result<reqwest::Response> {
        if self.credentials == Credentials::Missing {
            anyhow::bail!("TMDB credentials are not configured");
        }

        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let mut request = self.client.get(url).header("accept", "application/json");
            if let Credentials::Bearer(token) = &self.credentials {
                request = request.bearer_auth(token);
            }

            let resp = request
                .send()
                .await
                .with_context(|| format!("TMDB request failed: {}", redact(url)))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            let resp = resp
                .error_for_status()
                .with_context(|| format!("TMDB request returned error: {}", redact(url)))?;

            return Ok(resp);
        }
    }

    /// Build a full API URL with the language and, when used, API key parameters.
    fn url(&self, path: &str, extra_params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{path}?language={}", self.base_url, urlencoded(&self.language));
        if let Credentials::ApiKey(key) = &self.credentials {
            url.push_str("&api_key=");
            url.push_str(&urlencoded(key));
        }
        for (key, value) in extra_params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoded(value));
        }
        url
    }

    /// Convert a TMDB image path fragment to a full URL at the given size.
    fn image_url(&self, size: &str, path: Option<String>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}/{size}{p}", self.image_base_url))
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str, what: &str) -> anyhow::Result<T> {
        debug!(url = %redact(url), "TMDB {what}");
        self.get(url)
            .await?
            .json()
            .await
            .with_context(|| format!("failed to parse TMDB {what} response"))
    }
}

/// Hide the API key when a URL ends up in logs or errors.
fn redact(url: &str) -> String {
    match url.find("api_key=") {
        Some(start) => {
            let value_start = start + "api_key=".len();
            let end = url[value_start..]
                .find('&')
                .map_or(url.len(), |i| value_start + i);
            format!("{}***{}", &url[..value_start], &url[end..])
        }
        None => url.to_string(),
    }
}

/// Minimal percent-encoding for query parameter values.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";

/// Extract a four-digit year from a date string like `"2023-04-15"`.
fn parse_year(date: &Option<String>) -> Option<u16> {
    date.as_deref()
        .and_then(|d| d.get(..4))
        .and_then(|y| y.parse::<u16>().ok())
}

fn genre_names(genres: Option<Vec<TmdbGenre>>) -> Vec<String> {
    genres
        .unwrap_or_default()
        .into_iter()
        .filter_map(|g| g.name)
        .filter(|n| !n.is_empty())
        .collect()
}

fn top_cast(credits: Option<TmdbCredits>) -> Vec<String> {
    credits
        .map(|c| c.cast)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|m| m.name)
        .filter(|n| !n.is_empty())
        .take(CAST_LIMIT)
        .collect()
}

/// First non-empty certification among the US release dates.
fn us_certification(release_dates: Option<TmdbReleaseDates>) -> Option<String> {
    release_dates?
        .results
        .into_iter()
        .filter(|r| r.iso_3166_1.as_deref() == Some(CERTIFICATION_COUNTRY))
        .flat_map(|r| r.release_dates)
        .filter_map(|d| d.certification)
        .map(|c| c.trim().to_string())
        .find(|c| !c.is_empty())
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    fn is_available(&self) -> bool {
        self.credentials != Credentials::Missing
    }

    async fn search_movie(
        &self,
        query: &str,
        year: Option<u16>,
    ) -> anyhow::Result<Vec<SearchResult>> {
        let mut params = vec![("query", query), ("include_adult", "false"), ("page", "1")];
        let year_str = year.map(|y| y.to_string());
        if let Some(ref y) = year_str {
            params.push(("year", y.as_str()));
        }

        let url = self.url("/search/movie", &params);
        let body: TmdbSearchResponse<TmdbMovieSearchResult> =
            self.fetch(&url, "movie search").await?;

        Ok(body
            .results
            .into_iter()
            .map(|r| SearchResult {
                id: r.id,
                title: r.title.or(r.original_title).unwrap_or_default(),
                year: parse_year(&r.release_date),
                overview: non_blank(r.overview),
                poster_url: self.image_url(&self.poster_size, r.poster_path),
            })
            .collect())
    }

    async fn movie_details(&self, id: u64) -> anyhow::Result<MovieDetails> {
        let url = self.url(
            &format!("/movie/{id}"),
            &[("append_to_response", "credits,release_dates")],
        );
        let detail: TmdbMovieDetail = self.fetch(&url, "movie details").await?;

        Ok(MovieDetails {
            genres: genre_names(detail.genres),
            runtime: detail.runtime,
            vote: detail.vote_average,
            tagline: non_blank(detail.tagline),
            backdrop_url: self.image_url(&self.backdrop_size, detail.backdrop_path),
            certification: us_certification(detail.release_dates),
            cast: top_cast(detail.credits),
        })
    }

    async fn search_tv(&self, query: &str) -> anyhow::Result<Vec<SearchResult>> {
        let url = self.url(
            "/search/tv",
            &[("query", query), ("include_adult", "false"), ("page", "1")],
        );
        let body: TmdbSearchResponse<TmdbTvSearchResult> = self.fetch(&url, "TV search").await?;

        Ok(body
            .results
            .into_iter()
            .map(|r| SearchResult {
                id: r.id,
                title: r.name.or(r.original_name).unwrap_or_default(),
                year: parse_year(&r.first_air_date),
                overview: non_blank(r.overview),
                poster_url: self.image_url(&self.poster_size, r.poster_path),
            })
            .collect())
    }

    async fn tv_details(&self, id: u64) -> anyhow::Result<ShowDetails> {
        let url = self.url(&format!("/tv/{id}"), &[("append_to_response", "credits")]);
        let detail: TmdbTvDetail = self.fetch(&url, "TV details").await?;

        Ok(ShowDetails {
            genres: genre_names(detail.genres),
            vote: detail.vote_average,
            tagline: non_blank(detail.tagline),
            backdrop_url: self.image_url(&self.backdrop_size, detail.backdrop_path),
            first_year: parse_year(&detail.first_air_date),
            cast: top_cast(detail.credits),
        })
    }

    async fn tv_episode_details(
        &self,
        id: u64,
        season: u32,
        episode: u32,
    ) -> anyhow::Result<EpisodeDetails> {
        let url = self.url(&format!("/tv/{id}/season/{season}/episode/{episode}"), &[]);
        let detail: TmdbEpisodeDetail = self.fetch(&url, "episode details").await?;

        Ok(EpisodeDetails {
            name: non_blank(detail.name),
        })
    }
}
