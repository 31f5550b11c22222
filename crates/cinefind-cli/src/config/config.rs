//! `AppConfig` struct and TOML loading.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default debounce quiet period in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Movie catalog settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Search input settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Search analytics settings.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Movie catalog configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API base URL override (default: TMDB v3).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Response language for detail requests (default: "en-US").
    #[serde(default)]
    pub language: Option<String>,
}

/// Search input configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period before typed text becomes a query.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl SearchConfig {
    /// Returns the debounce quiet period.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// Appwrite analytics configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Whether searches are recorded.
    #[serde(default)]
    pub enabled: bool,
    /// Appwrite endpoint (e.g. `https://cloud.appwrite.io/v1`).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Appwrite project ID.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Database ID.
    #[serde(default)]
    pub database_id: Option<String>,
    /// Collection ID holding the search counters.
    #[serde(default)]
    pub collection_id: Option<String>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}
