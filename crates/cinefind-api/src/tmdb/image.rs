//! TMDB image URL templating.

/// Base URL for TMDB image assets.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Local asset used when an image path is absent.
pub const FALLBACK_IMAGE: &str = "no-movie.png";

/// Image size segment of an image URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Poster size (`w500`).
    Poster,
    /// Profile photo size (`w185`).
    Profile,
    /// Original resolution, used for backdrops.
    Original,
}

impl ImageSize {
    /// Returns the URL path segment for this size.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poster => "w500",
            Self::Profile => "w185",
            Self::Original => "original",
        }
    }
}

/// Builds `https://image.tmdb.org/t/p/{size}/{path}`.
///
/// Returns `None` when the path is absent or blank.
#[must_use]
pub fn image_url(size: ImageSize, path: Option<&str>) -> Option<String> {
    let path = path
        .map(|p| p.trim_start_matches('/'))
        .filter(|p| !p.is_empty())?;
    Some(format!("{IMAGE_BASE_URL}/{}/{path}", size.as_str()))
}

/// Same as [`image_url`], falling back to [`FALLBACK_IMAGE`].
#[must_use]
pub fn image_url_or_fallback(size: ImageSize, path: Option<&str>) -> String {
    image_url(size, path).unwrap_or_else(|| String::from(FALLBACK_IMAGE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_url() {
        // Arrange & Act
        let url = image_url(ImageSize::Poster, Some("/qJ2tW6WMUDux911r6m7haRef0WH.jpg"));

        // Assert
        assert_eq!(
            url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/qJ2tW6WMUDux911r6m7haRef0WH.jpg")
        );
    }

    #[test]
    fn test_path_without_leading_slash() {
        // Arrange & Act
        let url = image_url(ImageSize::Profile, Some("abc.jpg"));

        // Assert
        assert_eq!(
            url.as_deref(),
            Some("https://image.tmdb.org/t/p/w185/abc.jpg")
        );
    }

    #[test]
    fn test_missing_path_uses_fallback() {
        // Arrange & Act & Assert
        assert_eq!(image_url(ImageSize::Original, None), None);
        assert_eq!(image_url(ImageSize::Original, Some("")), None);
        assert_eq!(
            image_url_or_fallback(ImageSize::Poster, None),
            FALLBACK_IMAGE
        );
    }
}
