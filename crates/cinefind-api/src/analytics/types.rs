//! Search analytics record types.

use crate::tmdb::MovieSummary;
use crate::tmdb::image::{ImageSize, image_url_or_fallback};

/// One search to be counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRecord {
    /// Normalized search term (the counter key).
    pub search_term: String,
    /// TMDB ID of the top result.
    pub movie_id: u64,
    /// Title of the top result.
    pub title: String,
    /// Poster URL of the top result (fallback asset when absent).
    pub poster_url: String,
}

impl SearchRecord {
    /// Builds a record from the raw query and the top result.
    #[must_use]
    pub fn new(query: &str, top_result: &MovieSummary) -> Self {
        Self {
            search_term: normalize_search_term(query),
            movie_id: top_result.id,
            title: top_result.title.clone(),
            poster_url: image_url_or_fallback(ImageSize::Poster, top_result.poster_path.as_deref()),
        }
    }
}

/// Normalizes a search term: trims, collapses inner whitespace and lowercases.
#[must_use]
pub fn normalize_search_term(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_search_term() {
        // Arrange & Act & Assert
        assert_eq!(
            normalize_search_term("  The   Dark Knight "),
            "the dark knight"
        );
        assert_eq!(normalize_search_term("BATMAN"), "batman");
        assert_eq!(normalize_search_term("   "), "");
    }

    #[test]
    fn test_record_from_top_result() {
        // Arrange
        let movie = MovieSummary {
            id: 268,
            title: String::from("Batman"),
            poster_path: Some(String::from("/cij4dd21v2Rk2YtUQbV5kW69WB2.jpg")),
            ..MovieSummary::default()
        };

        // Act
        let record = SearchRecord::new(" Batman ", &movie);

        // Assert
        assert_eq!(record.search_term, "batman");
        assert_eq!(record.movie_id, 268);
        assert_eq!(record.title, "Batman");
        assert_eq!(
            record.poster_url,
            "https://image.tmdb.org/t/p/w500/cij4dd21v2Rk2YtUQbV5kW69WB2.jpg"
        );
    }

    #[test]
    fn test_record_without_poster_uses_fallback() {
        // Arrange
        let movie = MovieSummary {
            id: 364,
            title: String::from("Batman Returns"),
            ..MovieSummary::default()
        };

        // Act
        let record = SearchRecord::new("batman returns", &movie);

        // Assert
        assert_eq!(record.poster_url, "no-movie.png");
    }
}
