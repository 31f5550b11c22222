//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints used by the
//! movie browser: search, discover, trending, and per-movie details,
//! credits and videos.

mod api;
mod client;
/// Image URL templating.
pub mod image;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use types::{
    CastEntry, CreditsResponse, Genre, MovieDetail, MovieListResponse, MovieSummary,
    ProductionCompany, Video, VideosResponse, select_trailer,
};
