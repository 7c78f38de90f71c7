//! The build pipeline: scan, enrich, localize assets and write the catalog.

mod executor;

pub use executor::{cache_file_name, BuildReport, Pipeline, ProgressCallback, EPISODE_CACHE_FILE};
