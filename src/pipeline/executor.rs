use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use marquee_common::Category;
use tracing::{debug, info};

use crate::cache::{JsonFileStore, MovieRecord, ShowRecord};
use crate::catalog::{
    self, movie_meta, newest_ids, CategoryStats, LibraryStats, MovieMeta, ShowStats,
};
use crate::config::Config;
use crate::images::{AssetFetcher, BACKDROPS_DIR, POSTERS_DIR, SHOW_POSTERS_DIR};
use crate::metadata::{EnrichmentService, EnrichmentSettings, MetadataProvider};
use crate::scanner::{scan_movie_like, scan_shows, LibraryLayout, ShowEntity, ShowLibrary};

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(f32, &str) + Send + Sync>;

/// Cache file for a category's enrichment records.
pub fn cache_file_name(category: Category) -> &'static str {
    match category {
        Category::Movies => "tmdb_movies_cache.json",
        Category::Standup => "tmdb_standup_cache.json",
        Category::Documentary => "tmdb_docs_cache.json",
        Category::Shows => "tmdb_tv_cache.json",
    }
}

/// Cache file for episode title lookups.
pub const EPISODE_CACHE_FILE: &str = "tmdb_tv_ep_cache.json";

/// What a finished build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub stats: LibraryStats,
}

/// Runs discovery, enrichment and catalog output for every category.
pub struct Pipeline {
    config: Config,
    layout: LibraryLayout,
    output_dir: PathBuf,
    service: EnrichmentService,
    client: reqwest::Client,
    progress_callback: Option<ProgressCallback>,
}

impl Pipeline {
    pub fn new(config: Config, provider: Arc<dyn MetadataProvider>) -> Result<Self> {
        let output_dir = config
            .library
            .resolved_output_dir()
            .context("No library root configured; cannot determine the output directory")?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.tmdb.timeout_secs))
            .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            layout: LibraryLayout::from(&config.library),
            service: EnrichmentService::new(provider, EnrichmentSettings::from(&config.tmdb)),
            output_dir,
            client,
            config,
            progress_callback: None,
        })
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn report_progress(&self, progress: f32, step: &str) {
        if let Some(ref cb) = self.progress_callback {
            cb(progress, step);
        }
        info!("[{:.0}%] {}", progress, step);
    }

    /// Run the whole build.
    ///
    /// Only a failure to write into the output directory aborts; provider and
    /// scan problems degrade the affected entries.
    pub async fn run(&self) -> Result<BuildReport> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory: {}", self.output_dir.display())
        })?;

        let total_steps = Category::MOVIE_LIKE.len() + 1;
        let mut categories = Vec::with_capacity(Category::MOVIE_LIKE.len());

        for (i, category) in Category::MOVIE_LIKE.into_iter().enumerate() {
            let progress = (i as f32 / total_steps as f32) * 100.0;
            self.report_progress(progress, &format!("Building {category}"));
            let stats = self
                .build_movie_like(category)
                .await
                .with_context(|| format!("Failed to build {category} catalog"))?;
            categories.push(stats);
        }

        let progress = (Category::MOVIE_LIKE.len() as f32 / total_steps as f32) * 100.0;
        self.report_progress(progress, "Building shows");
        let shows = self
            .build_shows()
            .await
            .context("Failed to build shows catalog")?;

        let stats = LibraryStats {
            generated_at: chrono::Utc::now(),
            categories,
            shows,
        };
        catalog::write_summary(&self.output_dir, &stats)?;
        self.report_progress(100.0, "Finalizing");

        Ok(BuildReport {
            output_dir: self.output_dir.clone(),
            stats,
        })
    }

    async fn build_movie_like(&self, category: Category) -> Result<CategoryStats> {
        let root = self.config.library.root(category);
        let entries = match root {
            Some(root) => scan_movie_like(root, category, &self.layout),
            None => {
                debug!(category = %category, "No root configured");
                Vec::new()
            }
        };

        let mut store: JsonFileStore<MovieRecord> =
            JsonFileStore::open(self.output_dir.join(cache_file_name(category)));
        let records = self
            .service
            .enrich_movie_like(&entries, category.year_policy(), &mut store)
            .await;

        let new_ids = newest_ids(&entries, self.config.catalog.new_items_limit);
        let mut meta = movie_meta(&entries, &records, &new_ids);
        self.localize_movie_assets(&mut meta).await;
        catalog::write_movie_like(&self.output_dir, category, &entries, &meta)?;

        Ok(CategoryStats::collect(
            category,
            &entries,
            root,
            &self.layout.output_dir_name,
            &self.layout.archived_dir_name,
            &new_ids,
        ))
    }

    async fn build_shows(&self) -> Result<ShowStats> {
        let root = self.config.library.root(Category::Shows);
        let mut library = match root {
            Some(root) => scan_shows(root, &self.layout),
            None => {
                debug!(category = %Category::Shows, "No root configured");
                ShowLibrary::default()
            }
        };

        let mut records: JsonFileStore<ShowRecord> =
            JsonFileStore::open(self.output_dir.join(cache_file_name(Category::Shows)));
        self.service.enrich_shows(&mut library.shows, &mut records).await;

        let mut titles: JsonFileStore<String> =
            JsonFileStore::open(self.output_dir.join(EPISODE_CACHE_FILE));
        self.service
            .fill_episode_titles(&mut library.shows, &mut titles)
            .await;

        self.localize_show_assets(&mut library.shows).await;
        catalog::mark_new_shows(
            &mut library.shows,
            self.config.catalog.new_items_limit,
            self.config.catalog.new_episodes_per_show,
        );
        library.rebuild_index();
        catalog::write_shows(&self.output_dir, &library)?;

        Ok(ShowStats::collect(&library, root, &self.layout.output_dir_name))
    }

    async fn localize_movie_assets(&self, meta: &mut std::collections::BTreeMap<String, MovieMeta>) {
        let assets = &self.config.assets;
        if assets.cache_posters {
            let posters = AssetFetcher::new(self.client.clone(), &self.output_dir, POSTERS_DIR);
            for (id, m) in meta.iter_mut() {
                m.poster_url = posters.localize(&m.poster_url, id).await;
            }
        }
        if assets.cache_backdrops {
            let backdrops = AssetFetcher::new(self.client.clone(), &self.output_dir, BACKDROPS_DIR);
            for (id, m) in meta.iter_mut() {
                m.backdrop_url = backdrops.localize(&m.backdrop_url, id).await;
            }
        }
    }

    async fn localize_show_assets(&self, shows: &mut [ShowEntity]) {
        let assets = &self.config.assets;
        if assets.cache_posters {
            let posters = AssetFetcher::new(self.client.clone(), &self.output_dir, SHOW_POSTERS_DIR);
            for show in shows.iter_mut() {
                show.poster_url = posters.localize(&show.poster_url, &show.id).await;
            }
        }
        if assets.cache_backdrops {
            let backdrops = AssetFetcher::new(self.client.clone(), &self.output_dir, BACKDROPS_DIR);
            for show in shows.iter_mut() {
                show.backdrop_url = backdrops.localize(&show.backdrop_url, &show.id).await;
            }
        }
    }
}
