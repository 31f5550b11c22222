//! Routes of the movie browser.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, bail};

/// Path prefix of the detail route.
const MOVIE_PREFIX: &str = "/movie/";

/// A browser location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    /// `/`: trending strip, search box and movie list.
    #[default]
    Home,
    /// `/movie/{id}`: detail overlay for one movie.
    Movie(u64),
}

impl Route {
    /// Returns the movie ID of a detail route.
    #[must_use]
    pub const fn movie_id(self) -> Option<u64> {
        match self {
            Self::Home => None,
            Self::Movie(movie_id) => Some(movie_id),
        }
    }
}

impl FromStr for Route {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::Home);
        }
        let Some(id) = trimmed.strip_prefix(MOVIE_PREFIX) else {
            bail!("unknown route: {path}");
        };
        let movie_id = id
            .parse::<u64>()
            .with_context(|| format!("invalid movie id in route: {path}"))?;
        Ok(Self::Movie(movie_id))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "/"),
            Self::Movie(movie_id) => write!(f, "{MOVIE_PREFIX}{movie_id}"),
        }
    }
}
