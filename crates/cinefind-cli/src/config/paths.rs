//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application directory under the user config root.
const APP_DIR: &str = "cinefind";

/// Resolves the config file path.
///
/// In order of precedence:
/// - `{dir}/config.toml` when `dir` is given (`--dir`).
/// - `$XDG_CONFIG_HOME/cinefind/config.toml` when that variable holds an
///   absolute path.
/// - `$HOME/.config/cinefind/config.toml`.
///
/// # Errors
///
/// Returns an error if no directory was given and `HOME` is not set.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path_from(
        dir.map(PathBuf::as_path),
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

/// Resolves the config file path from explicit inputs.
fn config_path_from(
    dir: Option<&Path>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir.join(CONFIG_FILE));
    }

    // XDG_CONFIG_HOME must be absolute; anything else is ignored.
    if let Some(config_home) = xdg_config_home.filter(|p| p.is_absolute()) {
        return Ok(config_home.join(APP_DIR).join(CONFIG_FILE));
    }

    match home.filter(|p| !p.as_os_str().is_empty()) {
        Some(home) => Ok(home.join(".config").join(APP_DIR).join(CONFIG_FILE)),
        None => bail!("HOME is not set; pass --dir to locate config.toml"),
    }
}
