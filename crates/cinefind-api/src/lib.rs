//! API client library for cinefind.
//!
//! Provides the TMDB catalog client and the search analytics store client.

/// Search analytics store client.
pub mod analytics;

/// TMDB API client.
pub mod tmdb;
