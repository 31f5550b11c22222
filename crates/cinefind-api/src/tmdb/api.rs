//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{CreditsResponse, MovieDetail, MovieListResponse, VideosResponse};

/// Movie catalog trait.
///
/// Abstracts catalog operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait;
/// implementors target `CatalogApi` so request futures can be spawned.
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Searches movies by free text.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the status is not a
    /// success, or JSON parsing fails.
    async fn search_movies(&self, query: &str) -> Result<MovieListResponse>;

    /// Discovers movies sorted by descending popularity.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover_movies(&self) -> Result<MovieListResponse>;

    /// Fetches today's trending movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn trending_movies(&self) -> Result<MovieListResponse>;

    /// Fetches full details for one movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetail>;

    /// Fetches the credits (cast) for one movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_credits(&self, movie_id: u64) -> Result<CreditsResponse>;

    /// Fetches the video list for one movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_videos(&self, movie_id: u64) -> Result<VideosResponse>;
}
