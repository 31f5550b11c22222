//! TMDB API response types.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

/// Video type accepted as a trailer.
const TRAILER_TYPE: &str = "Trailer";

/// Video site accepted as a trailer.
const TRAILER_SITE: &str = "YouTube";

/// Value of the `Response` field that flags an application-level failure.
const RESPONSE_FALSE: &str = "False";

// --- Movie lists (search / discover / trending) ---

/// Response from the `search/movie`, `discover/movie` and
/// `trending/movie/day` endpoints.
///
/// Besides the usual paging fields, the body may carry an
/// application-level failure flag (`"Response": "False"`) together with
/// an `"Error"` message while the HTTP status is still 2xx.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieListResponse {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Movies on this page.
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
    /// Application-level status flag (`"False"` on failure).
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    /// Application-level error message.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl MovieListResponse {
    /// Returns `true` when the body flags an application-level failure.
    #[must_use]
    pub fn is_app_failure(&self) -> bool {
        self.response.as_deref() == Some(RESPONSE_FALSE)
    }

    /// Returns the server-supplied error message, ignoring blank values.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|msg| !msg.trim().is_empty())
    }
}

/// A single movie in a list response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl MovieSummary {
    /// Returns the release year, if the release date parses.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        parse_year(self.release_date.as_deref())
    }
}

// --- Movie details ---

/// Response from the `movie/{movie_id}` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieDetail {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Budget in USD (0 when unknown).
    #[serde(default)]
    pub budget: u64,
    /// Revenue in USD (0 when unknown).
    #[serde(default)]
    pub revenue: u64,
    /// Genres, in API order.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Production companies, in API order.
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    /// Release status (e.g. "Released").
    #[serde(default)]
    pub status: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl MovieDetail {
    /// Returns the release year, if the release date parses.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        parse_year(self.release_date.as_deref())
    }

    /// Returns production company names joined with `", "`.
    #[must_use]
    pub fn company_names(&self) -> String {
        self.production_companies
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Production company entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductionCompany {
    /// Company ID.
    pub id: u64,
    /// Company name.
    pub name: String,
    /// Logo image path.
    #[serde(default)]
    pub logo_path: Option<String>,
}

// --- Credits ---

/// Response from the `movie/{movie_id}/credits` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreditsResponse {
    /// TMDB movie ID.
    #[serde(default)]
    pub id: Option<u64>,
    /// Cast, in billing order.
    #[serde(default)]
    pub cast: Vec<CastEntry>,
}

/// A single cast member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CastEntry {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: u32,
}

// --- Videos ---

/// Response from the `movie/{movie_id}/videos` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VideosResponse {
    /// TMDB movie ID.
    #[serde(default)]
    pub id: Option<u64>,
    /// Videos, in API order.
    #[serde(default)]
    pub results: Vec<Video>,
}

impl VideosResponse {
    /// Returns the first YouTube trailer in the list.
    #[must_use]
    pub fn trailer(&self) -> Option<&Video> {
        select_trailer(&self.results)
    }
}

/// A single video entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Video {
    /// Site-specific video key.
    #[serde(default)]
    pub key: String,
    /// Hosting site (e.g. "YouTube").
    #[serde(default)]
    pub site: String,
    /// Video type (e.g. "Trailer", "Teaser").
    #[serde(rename = "type", default)]
    pub video_type: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Whether the video is official.
    #[serde(default)]
    pub official: bool,
}

impl Video {
    /// Returns the YouTube watch URL for this video.
    #[must_use]
    pub fn youtube_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}

/// Selects the trailer: the first video, in list order, whose type is
/// `"Trailer"` and whose site is `"YouTube"`.
#[must_use]
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.video_type == TRAILER_TYPE && v.site == TRAILER_SITE)
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

/// Parses the year out of a `YYYY-MM-DD` date.
fn parse_year(date: Option<&str>) -> Option<i32> {
    let date = date?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}
