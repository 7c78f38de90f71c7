//! Local caching of poster and backdrop images.
//!
//! Provider image URLs are downloaded into the output directory so the
//! catalog can reference them without network access.

mod fetcher;

pub use fetcher::{AssetFetcher, BACKDROPS_DIR, POSTERS_DIR, SHOW_POSTERS_DIR};
