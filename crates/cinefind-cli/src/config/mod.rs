//! Application configuration module.
//!
//! Manages the TOML config file holding catalog, search and analytics
//! settings. Secrets stay in the environment.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AnalyticsConfig, AppConfig};
pub use paths::resolve_config_path;
