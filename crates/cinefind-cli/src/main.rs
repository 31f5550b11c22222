//! cinefind - movie discovery CLI and terminal browser.

/// Analytics backend selection.
mod analytics;
/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use cinefind_api::tmdb::{MovieSummary, TmdbClient};
use cinefind_core::detail::{DetailController, DetailState, MovieView};
use cinefind_core::fetch_state::FetchState;
use cinefind_core::list::{ListController, ListRequest};
use cinefind_core::session::BrowseSession;
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::analytics::AnalyticsBackend;
use crate::config::{AppConfig, resolve_config_path};

/// User-Agent sent to every backend.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Write logs to this file instead of stdout.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search movies by title.
    Search(SearchArgs),
    /// List popular movies.
    Discover,
    /// List today's trending movies.
    Trending(TrendingArgs),
    /// Show details, cast and trailer for one movie.
    Movie(MovieArgs),
    /// Browse interactively in the terminal.
    Browse,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "spider man").
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Maximum number of movies to show.
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
struct MovieArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Loads the config file for `dir`.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds a `TmdbClient` from config and the `TMDB_API_TOKEN` environment
/// variable.
///
/// A missing token is only warned about; requests then fail authentication.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN").unwrap_or_else(|_| {
        tracing::warn!("TMDB_API_TOKEN is not set; catalog requests will be rejected");
        String::new()
    });

    let mut builder = TmdbClient::builder()
        .api_token(api_token)
        .user_agent(USER_AGENT);
    if let Some(base_url) = &config.tmdb.base_url {
        let url =
            Url::parse(base_url).with_context(|| format!("invalid tmdb.base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }
    if let Some(language) = &config.tmdb.language {
        builder = builder.language(language.as_str());
    }
    builder.build().context("failed to build TMDB client")
}

/// Builds the analytics backend from config and `APPWRITE_API_KEY`.
///
/// # Errors
///
/// Returns an error if analytics is enabled but misconfigured.
#[instrument(skip_all)]
fn build_analytics(config: &AppConfig) -> Result<AnalyticsBackend> {
    let api_key = std::env::var("APPWRITE_API_KEY").ok();
    AnalyticsBackend::from_config(&config.analytics, api_key, USER_AGENT)
}

/// Config plus the shared backend clients.
struct Clients {
    /// Loaded configuration.
    config: AppConfig,
    /// Movie catalog client.
    catalog: Arc<TmdbClient>,
    /// Search analytics store.
    analytics: Arc<AnalyticsBackend>,
}

/// Loads config and builds the shared backend clients.
///
/// # Errors
///
/// Returns an error if config loading or client construction fails.
fn build_clients(dir: Option<&PathBuf>) -> Result<Clients> {
    let config = load_config(dir)?;
    let catalog = Arc::new(build_tmdb_client(&config)?);
    let analytics = Arc::new(build_analytics(&config)?);
    Ok(Clients {
        config,
        catalog,
        analytics,
    })
}

/// Runs one list request to completion and returns the movies.
///
/// # Errors
///
/// Returns the user-facing message if the request failed.
async fn fetch_list(dir: Option<&PathBuf>, request: ListRequest) -> Result<Vec<MovieSummary>> {
    let clients = build_clients(dir)?;
    let mut list = ListController::new(clients.catalog, clients.analytics);
    list.submit(request);
    list.settle().await;
    list.flush_side_effects().await;

    match list.state() {
        FetchState::Success(movies) => Ok(movies.clone()),
        FetchState::Error(message) => bail!("{message}"),
        FetchState::Idle | FetchState::Loading => bail!("request did not complete"),
    }
}

/// Logs a movie list as tab-separated rows.
fn log_movies(movies: &[MovieSummary]) {
    tracing::info!("ID\tTitle\t\t\tYear\tRating\tLang");
    for movie in movies {
        tracing::info!(
            "{}\t{}\t{}\t{:.1}\t{}",
            movie.id,
            movie.title,
            movie
                .release_year()
                .map_or_else(|| String::from("-"), |y| y.to_string()),
            movie.vote_average,
            movie.original_language.as_deref().unwrap_or("-"),
        );
    }
    tracing::info!("Total: {} movies", movies.len());
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the search fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let movies = fetch_list(dir, ListRequest::for_query(&args.query)).await?;
    log_movies(&movies);
    Ok(())
}

/// Runs the `discover` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_discover(dir: Option<&PathBuf>) -> Result<()> {
    let movies = fetch_list(dir, ListRequest::Discover).await?;
    log_movies(&movies);
    Ok(())
}

/// Runs the `trending` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_trending(args: &TrendingArgs, dir: Option<&PathBuf>) -> Result<()> {
    let movies = fetch_list(dir, ListRequest::Trending).await?;
    let shown: Vec<MovieSummary> = movies.into_iter().take(args.limit).collect();
    log_movies(&shown);
    Ok(())
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or every detail request
/// fails.
#[instrument(skip_all)]
async fn run_movie(args: &MovieArgs, dir: Option<&PathBuf>) -> Result<()> {
    let clients = build_clients(dir)?;
    let mut detail = DetailController::new(clients.catalog);
    detail.open(args.id);
    detail.settle().await;

    match detail.state() {
        DetailState::Ready(view) => {
            log_movie_view(view);
            Ok(())
        }
        DetailState::Failed { message, .. } => bail!("{message}"),
        DetailState::Closed | DetailState::Loading(_) => bail!("request did not complete"),
    }
}

/// Logs the detail view, one field per line.
fn log_movie_view(view: &MovieView) {
    for line in tui::detail_lines(view) {
        tracing::info!("{line}");
    }
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the clients fail to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let clients = build_clients(dir)?;
    let session = BrowseSession::new(
        clients.catalog,
        clients.analytics,
        clients.config.search.debounce(),
    );
    tui::run_browser(session)
        .await
        .context("browser TUI failed")
}

/// Initializes tracing, writing to `log_file` when given.
///
/// The TUI owns the terminal, so `browse` without a log file discards logs.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
fn init_tracing(log_file: Option<&Path>, quiet: bool) -> Result<()> {
    let (writer, ansi) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None if quiet => (BoxMakeWriter::new(std::io::sink), false),
        None => (BoxMakeWriter::new(std::io::stdout), true),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let quiet = matches!(cli.command, Commands::Browse);
    init_tracing(cli.log_file.as_deref(), quiet)?;

    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Discover => run_discover(dir).await,
        Commands::Trending(args) => run_trending(&args, dir).await,
        Commands::Movie(args) => run_movie(&args, dir).await,
        Commands::Browse => run_browse(dir).await,
    }
}
