//! Metadata resolution for catalog entities.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition and shared data types.
//! - [`providers`] -- Concrete provider implementations (TMDB).
//! - [`variants`] -- Query variants tried for each entity.
//! - [`scorer`] -- Candidate scoring and best-match selection.
//! - [`enrichment`] -- Cache-aware enrichment of movie-like entries and shows.

pub mod enrichment;
pub mod provider;
pub mod providers;
pub mod scorer;
pub mod variants;

pub use enrichment::{EnrichmentService, EnrichmentSettings, Resolver};
pub use provider::{EpisodeDetails, MetadataProvider, MovieDetails, SearchResult, ShowDetails};
pub use providers::TmdbProvider;
