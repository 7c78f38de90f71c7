//! Enrichment service for attaching provider metadata to scanned entities.
//!
//! The [`EnrichmentService`] drives the per-entity workflow: decide from the
//! cached record whether a search and/or a detail fetch is needed, run the
//! query variants through the [`Resolver`], merge results into the record
//! with fill-if-empty semantics, and flush the store after every entity.
//! Provider failures never abort a run; the entity keeps whatever the cache
//! and the filesystem already know.

use std::sync::Arc;
use std::time::Duration;

use marquee_common::format::format_runtime;
use marquee_common::YearPolicy;
use tracing::{debug, info, warn};

use super::provider::{MetadataProvider, MovieDetails, SearchResult, ShowDetails};
use super::scorer::pick_best;
use super::variants::{movie_attempts, show_attempts, SearchAttempt};
use crate::cache::{self, MovieRecord, RecordStore, ShowRecord};
use crate::config::TmdbConfig;
use crate::scanner::{CatalogEntry, ShowEntity};

/// Pauses between provider-facing units of work.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrichmentSettings {
    /// After each entity that made provider calls.
    pub request_delay: Duration,
    /// After each episode title lookup.
    pub episode_delay: Duration,
}

impl From<&TmdbConfig> for EnrichmentSettings {
    fn from(config: &TmdbConfig) -> Self {
        Self {
            request_delay: Duration::from_millis(config.request_delay_ms),
            episode_delay: Duration::from_millis(config.episode_delay_ms),
        }
    }
}

/// Runs search attempts in order and returns the first accepted match.
pub struct Resolver<'a> {
    provider: &'a dyn MetadataProvider,
}

impl<'a> Resolver<'a> {
    pub fn new(provider: &'a dyn MetadataProvider) -> Self {
        Self { provider }
    }

    /// Movie search. An attempt that errors or returns nothing moves on to
    /// the next one.
    pub async fn resolve_movie(&self, attempts: &[SearchAttempt]) -> Option<SearchResult> {
        for attempt in attempts {
            debug!(query = %attempt.query, year = ?attempt.year, "Searching movie");
            match self.provider.search_movie(&attempt.query, attempt.year).await {
                Ok(results) => {
                    if let Some(best) = pick_best(&attempt.query, attempt.year, &results) {
                        return Some(best.clone());
                    }
                }
                Err(e) => {
                    warn!(query = %attempt.query, year = ?attempt.year, error = %format!("{e:#}"), "Movie search failed");
                }
            }
        }
        None
    }

    /// Show search. Attempts are yearless.
    pub async fn resolve_show(&self, attempts: &[SearchAttempt]) -> Option<SearchResult> {
        for attempt in attempts {
            debug!(query = %attempt.query, "Searching TV");
            match self.provider.search_tv(&attempt.query).await {
                Ok(results) => {
                    if let Some(best) = pick_best(&attempt.query, None, &results) {
                        return Some(best.clone());
                    }
                }
                Err(e) => {
                    warn!(query = %attempt.query, error = %format!("{e:#}"), "TV search failed");
                }
            }
        }
        None
    }
}

/// Service that enriches catalog entities with provider metadata.
///
/// # Example
///
/// ```rust,ignore
/// let service = EnrichmentService::new(provider, EnrichmentSettings::from(&config.tmdb));
/// let records = service
///     .enrich_movie_like(&entries, YearPolicy::YearAware, &mut store)
///     .await;
/// ```
pub struct EnrichmentService {
    provider: Arc<dyn MetadataProvider>,
    settings: EnrichmentSettings,
}

impl EnrichmentService {
    pub fn new(provider: Arc<dyn MetadataProvider>, settings: EnrichmentSettings) -> Self {
        Self { provider, settings }
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.provider.as_ref())
    }

    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Enrich movie-like entries, returning one record per entry in order.
    ///
    /// Records are read from and written back to `store` under
    /// `"<title>|<year>"`. The store is flushed after every entry; a failed
    /// flush is logged and enrichment continues.
    pub async fn enrich_movie_like(
        &self,
        entries: &[CatalogEntry],
        policy: YearPolicy,
        store: &mut dyn RecordStore<MovieRecord>,
    ) -> Vec<MovieRecord> {
        let mut records = Vec::with_capacity(entries.len());

        for entry in entries {
            let key = cache::movie_key(&entry.title, entry.year);
            let mut record = store.get(&key).unwrap_or_default();
            let made_calls = self.enrich_movie(entry, policy, &mut record).await;

            store.put(&key, record.clone());
            flush_or_warn(store);
            records.push(record);

            if made_calls {
                self.pause(self.settings.request_delay).await;
            }
        }

        records
    }

    /// Returns whether any provider call was made.
    async fn enrich_movie(&self, entry: &CatalogEntry, policy: YearPolicy, record: &mut MovieRecord) -> bool {
        let needed_details = record.needs_details();
        if !record.needs_search() && !record.needs_detail_fetch(needed_details) {
            debug!(title = %entry.title, year = ?entry.year, "Cache complete; skipping provider");
            return false;
        }

        if !self.provider.is_available() {
            warn!(
                title = %entry.title,
                year = ?entry.year,
                provider = self.provider.name(),
                "No provider credentials; using filesystem data only"
            );
            return false;
        }

        let mut made_calls = false;

        if record.needs_search() {
            made_calls = true;
            let attempts = movie_attempts(&entry.title, entry.year, policy);
            match self.resolver().resolve_movie(&attempts).await {
                Some(hit) => {
                    info!(title = %entry.title, year = ?entry.year, provider_id = hit.id, matched = %hit.title, "Matched movie");
                    record.fill_from(&movie_search_patch(&hit));
                }
                None => info!(title = %entry.title, year = ?entry.year, "No movie match"),
            }
        }

        if let Some(id) = record.movie_id.filter(|_| record.needs_detail_fetch(needed_details)) {
            made_calls = true;
            match self.provider.movie_details(id).await {
                Ok(details) => {
                    record.fill_from(&movie_details_patch(&details));
                    debug!(
                        title = %entry.title,
                        provider_id = id,
                        runtime = ?format_runtime(record.runtime),
                        certification = ?record.certification,
                        "Fetched movie details"
                    );
                }
                Err(e) => warn!(title = %entry.title, provider_id = id, error = %format!("{e:#}"), "No movie details"),
            }
        }

        made_calls
    }

    /// Enrich shows in place from and into `store` (keyed by lower-cased title).
    pub async fn enrich_shows(
        &self,
        shows: &mut [ShowEntity],
        store: &mut dyn RecordStore<ShowRecord>,
    ) {
        for show in shows.iter_mut() {
            let key = cache::show_key(&show.title);
            let mut record = store.get(&key).unwrap_or_default();
            let made_calls = self.enrich_show(&show.title, &mut record).await;

            store.put(&key, record.clone());
            flush_or_warn(store);
            apply_show_record(show, &record);

            if made_calls {
                self.pause(self.settings.request_delay).await;
            }
        }
    }

    async fn enrich_show(&self, title: &str, record: &mut ShowRecord) -> bool {
        let needed_details = record.needs_details();
        if !record.needs_search() && !record.needs_detail_fetch(needed_details) {
            debug!(title = title, "Cache complete; skipping provider");
            return false;
        }

        if !self.provider.is_available() {
            warn!(title = title, provider = self.provider.name(), "No provider credentials; using filesystem data only");
            return false;
        }

        let mut made_calls = false;

        if record.needs_search() {
            made_calls = true;
            match self.resolver().resolve_show(&show_attempts(title)).await {
                Some(hit) => {
                    info!(title = title, provider_id = hit.id, matched = %hit.title, "Matched show");
                    record.fill_from(&show_search_patch(&hit));
                }
                None => info!(title = title, "No TV match"),
            }
        }

        if let Some(id) = record.tv_id.filter(|_| record.needs_detail_fetch(needed_details)) {
            made_calls = true;
            match self.provider.tv_details(id).await {
                Ok(details) => record.fill_from(&show_details_patch(&details)),
                Err(e) => warn!(title = title, provider_id = id, error = %format!("{e:#}"), "No TV details"),
            }
        }

        made_calls
    }

    /// Fill missing episode titles for shows with a provider id.
    ///
    /// Any cached entry, including an empty one, suppresses the lookup. A
    /// failed or empty lookup is cached as `""`.
    pub async fn fill_episode_titles(
        &self,
        shows: &mut [ShowEntity],
        store: &mut dyn RecordStore<String>,
    ) {
        let available = self.provider.is_available();
        let mut warned = false;

        for show in shows.iter_mut() {
            let Some(tv_id) = show.tmdb_id else {
                continue;
            };
            let show_title = show.title.clone();

            for ep in show.episodes_mut() {
                if ep.has_title() {
                    continue;
                }

                let key = cache::episode_key(tv_id, ep.season, ep.episode);
                if let Some(name) = store.get(&key) {
                    if !name.is_empty() {
                        ep.title = Some(name);
                    }
                    continue;
                }

                if !available {
                    if !warned {
                        warn!(show = %show_title, provider = self.provider.name(), "No provider credentials; episode titles left empty");
                        warned = true;
                    }
                    continue;
                }

                let name = match self.provider.tv_episode_details(tv_id, ep.season, ep.episode).await {
                    Ok(details) => details.name.unwrap_or_default(),
                    Err(e) => {
                        warn!(show = %show_title, season = ep.season, episode = ep.episode, error = %format!("{e:#}"), "Episode lookup failed");
                        String::new()
                    }
                };

                store.put(&key, name.clone());
                flush_or_warn(store);
                if !name.is_empty() {
                    debug!(show = %show_title, key = %ep.key, title = %name, "Filled episode title");
                    ep.title = Some(name);
                }
                self.pause(self.settings.episode_delay).await;
            }
        }
    }
}

fn flush_or_warn<R>(store: &mut dyn RecordStore<R>) {
    if let Err(e) = store.flush() {
        warn!(error = %format!("{e:#}"), "Failed to write metadata cache");
    }
}

fn movie_search_patch(hit: &SearchResult) -> MovieRecord {
    MovieRecord {
        movie_id: Some(hit.id),
        poster_url: hit.poster_url.clone().unwrap_or_default(),
        overview: hit.overview.clone().unwrap_or_default(),
        ..Default::default()
    }
}

fn movie_details_patch(details: &MovieDetails) -> MovieRecord {
    MovieRecord {
        genres: details.genres.clone(),
        runtime: details.runtime,
        vote: details.vote,
        certification: details.certification.clone(),
        cast: details.cast.clone(),
        backdrop_url: details.backdrop_url.clone().unwrap_or_default(),
        tagline: details.tagline.clone().unwrap_or_default(),
        ..Default::default()
    }
}

fn show_search_patch(hit: &SearchResult) -> ShowRecord {
    ShowRecord {
        tv_id: Some(hit.id),
        poster_url: hit.poster_url.clone().unwrap_or_default(),
        overview: hit.overview.clone().unwrap_or_default(),
        first_year: hit.year,
        ..Default::default()
    }
}

fn show_details_patch(details: &ShowDetails) -> ShowRecord {
    ShowRecord {
        genres: details.genres.clone(),
        vote: details.vote,
        first_year: details.first_year,
        cast: details.cast.clone(),
        backdrop_url: details.backdrop_url.clone().unwrap_or_default(),
        tagline: details.tagline.clone().unwrap_or_default(),
        ..Default::default()
    }
}

/// Copy a cached record onto the show entity. The poster stays remote here;
/// asset localization happens later.
pub fn apply_show_record(show: &mut ShowEntity, record: &ShowRecord) {
    show.tmdb_id = record.tv_id;
    show.poster_url = record.poster_url.clone();
    show.overview = record.overview.clone();
    show.genres = record.genres.clone();
    show.vote = record.vote;
    show.first_year = record.first_year;
    show.cast = record.cast.clone();
    show.backdrop_url = record.backdrop_url.clone();
    show.tagline = record.tagline.clone();
}
