#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

/// Writes a config pointing the catalog at a closed local port.
fn unreachable_catalog_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[tmdb]\nbase_url = \"http://127.0.0.1:9/3/\"\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("trending"))
        .stdout(predicate::str::contains("browse"));
}

#[test]
fn test_search_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--query"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_movie_missing_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.arg("movie")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_movie_invalid_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["movie", "--id", "batman"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_trending_invalid_limit() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["trending", "--limit", "-1"]).assert().failure();
}

#[test]
fn test_invalid_config_is_reported() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[search]\ndebounce_ms = \"x\"\n",
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["discover", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_search_unreachable_catalog_shows_generic_error() {
    // Arrange
    let dir = unreachable_catalog_dir();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["search", "--query", "batman", "--dir"])
        .arg(dir.path())
        .env("TMDB_API_TOKEN", "test-token")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error fetching movies. Please try again later.",
        ));
}

#[test]
fn test_trending_unreachable_catalog_shows_trending_error() {
    // Arrange
    let dir = unreachable_catalog_dir();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["trending", "--dir"])
        .arg(dir.path())
        .env("TMDB_API_TOKEN", "test-token")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load trending movies."));
}

#[test]
fn test_movie_unreachable_catalog_shows_detail_error() {
    // Arrange
    let dir = unreachable_catalog_dir();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["movie", "--id", "155", "--dir"])
        .arg(dir.path())
        .env("TMDB_API_TOKEN", "test-token")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load movie details."));
}

#[test]
fn test_dir_config_is_used() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[tmdb]\nbase_url = \"not a url\"\n",
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["discover", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid tmdb.base_url: not a url"));
}

#[test]
fn test_xdg_config_home_is_used_without_dir() {
    // Arrange
    let config_home = tempfile::tempdir().unwrap();
    let app_dir = config_home.path().join("cinefind");
    std::fs::create_dir(&app_dir).unwrap();
    std::fs::write(
        app_dir.join("config.toml"),
        "[tmdb]\nbase_url = \"not a url\"\n",
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.arg("discover")
        .env("XDG_CONFIG_HOME", config_home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid tmdb.base_url: not a url"));
}
