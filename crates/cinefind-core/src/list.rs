//! Movie list controller for search, discovery and trending requests.
//!
//! A [`ListController`] owns one [`FetchState`] and at most one request task.
//! Every submitted request gets a new generation number; a completion is only
//! applied when its generation is still the current one, so a slow response
//! to a superseded query can never replace the newer result.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use cinefind_api::analytics::{AnalyticsStore, SearchRecord};
use cinefind_api::tmdb::{CatalogApi, MovieListResponse, MovieSummary};
use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle, JoinSet};

use crate::fetch_state::FetchState;

/// User-facing message for failed search and discover requests.
pub const SEARCH_ERROR_MESSAGE: &str = "Error fetching movies. Please try again later.";

/// User-facing message for a failed trending request.
pub const TRENDING_ERROR_MESSAGE: &str = "Failed to load trending movies.";

/// Message used when the server flags a failure without saying why.
pub const APP_FAILURE_FALLBACK: &str = "Failed to fetch movies";

/// One catalog list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRequest {
    /// Popular movies, most popular first.
    Discover,
    /// Free-text search.
    Search(String),
    /// Today's trending movies.
    Trending,
}

impl ListRequest {
    /// Maps a settled query to a request: blank means discover.
    #[must_use]
    pub fn for_query(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            Self::Discover
        } else {
            Self::Search(String::from(query))
        }
    }

    /// Returns the search text for a non-blank search.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Search(query) if !query.trim().is_empty() => Some(query),
            _ => None,
        }
    }

    /// Returns the message shown when this request fails.
    #[must_use]
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::Discover | Self::Search(_) => SEARCH_ERROR_MESSAGE,
            Self::Trending => TRENDING_ERROR_MESSAGE,
        }
    }

    /// Issues the matching catalog call.
    async fn fetch<C>(&self, catalog: &C) -> Result<MovieListResponse>
    where
        C: CatalogApi + Sync,
    {
        match self {
            Self::Discover => catalog.discover_movies().await,
            Self::Search(query) => catalog.search_movies(query).await,
            Self::Trending => catalog.trending_movies().await,
        }
    }
}

impl fmt::Display for ListRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discover => write!(f, "discover"),
            Self::Search(query) => write!(f, "search {query:?}"),
            Self::Trending => write!(f, "trending"),
        }
    }
}

/// Result of one request task, tagged with the generation that issued it.
#[derive(Debug)]
pub struct ListCompletion {
    /// Generation of the submitting call.
    pub generation: u64,
    /// The request that was issued.
    pub request: ListRequest,
    /// Catalog response.
    pub result: Result<MovieListResponse>,
}

/// Outcome of reconciling a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTransition {
    /// The completion belonged to a superseded request and was dropped.
    Stale,
    /// The list now holds `count` movies.
    Succeeded {
        /// Number of movies received.
        count: usize,
    },
    /// Transport or HTTP failure.
    Failed,
    /// The server flagged an application-level failure; owners should clear
    /// any related lists too.
    AppFailure,
}

/// State machine for one movie list.
#[derive(Debug)]
pub struct ListController<C, A> {
    /// Catalog client.
    catalog: Arc<C>,
    /// Search analytics sink.
    analytics: Arc<A>,
    /// Current state.
    state: FetchState<Vec<MovieSummary>>,
    /// Generation of the authoritative request.
    generation: u64,
    /// Authoritative request.
    request: Option<ListRequest>,
    /// Task of the authoritative request.
    in_flight: Option<JoinHandle<ListCompletion>>,
    /// Detached analytics writes.
    side_effects: JoinSet<()>,
}

impl<C, A> ListController<C, A>
where
    C: CatalogApi + Send + Sync + 'static,
    A: AnalyticsStore + Send + Sync + 'static,
{
    /// Creates an idle controller.
    #[must_use]
    pub fn new(catalog: Arc<C>, analytics: Arc<A>) -> Self {
        Self {
            catalog,
            analytics,
            state: FetchState::Idle,
            generation: 0,
            request: None,
            in_flight: None,
            side_effects: JoinSet::new(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &FetchState<Vec<MovieSummary>> {
        &self.state
    }

    /// Returns the displayed movies (empty unless the last request succeeded).
    #[must_use]
    pub fn movies(&self) -> &[MovieSummary] {
        match self.state.value() {
            Some(movies) => movies.as_slice(),
            None => &[],
        }
    }

    /// Returns the authoritative request.
    #[must_use]
    pub const fn request(&self) -> Option<&ListRequest> {
        self.request.as_ref()
    }

    /// Returns the generation of the authoritative request.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Supersedes any in-flight request and starts `request`.
    ///
    /// Must be called within a tokio runtime.
    pub fn submit(&mut self, request: ListRequest) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        tracing::debug!(generation, request = %request, "Submitting list request");

        self.state = FetchState::Loading;
        self.request = Some(request.clone());

        let catalog = Arc::clone(&self.catalog);
        self.in_flight = Some(tokio::spawn(async move {
            let result = request.fetch(catalog.as_ref()).await;
            ListCompletion {
                generation,
                request,
                result,
            }
        }));
    }

    /// Reconciles a completion into the controller state.
    pub fn apply(&mut self, completion: ListCompletion) -> ListTransition {
        if completion.generation != self.generation {
            tracing::debug!(
                generation = completion.generation,
                current = self.generation,
                request = %completion.request,
                "Discarding stale list response"
            );
            return ListTransition::Stale;
        }
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }

        let request = completion.request;
        match completion.result {
            Err(err) => {
                tracing::error!(request = %request, "Error fetching movies: {err:#}");
                self.state = FetchState::Error(String::from(request.failure_message()));
                ListTransition::Failed
            }
            Ok(response) if response.is_app_failure() => {
                let message = response.error_message().unwrap_or(APP_FAILURE_FALLBACK);
                tracing::warn!(
                    request = %request,
                    server_message = message,
                    "Catalog reported a failure"
                );
                self.state = FetchState::Error(String::from(message));
                ListTransition::AppFailure
            }
            Ok(response) => {
                let movies = response.results;
                if let Some(query) = request.query()
                    && let Some(top) = movies.first()
                {
                    self.record_search(SearchRecord::new(query, top));
                }
                let count = movies.len();
                tracing::debug!(request = %request, count, "List request succeeded");
                self.state = FetchState::Success(movies);
                ListTransition::Succeeded { count }
            }
        }
    }

    /// Applies the in-flight completion if it has finished, without waiting.
    pub fn poll(&mut self) -> Option<ListTransition> {
        self.reap_side_effects();
        let handle = self.in_flight.as_mut()?;
        if !handle.is_finished() {
            return None;
        }
        let joined = handle.now_or_never()?;
        self.in_flight = None;
        Some(self.finish(joined))
    }

    /// Waits for the in-flight completion and applies it.
    pub async fn settle(&mut self) -> Option<ListTransition> {
        let handle = self.in_flight.take()?;
        let joined = handle.await;
        Some(self.finish(joined))
    }

    /// Waits for all detached analytics writes.
    pub async fn flush_side_effects(&mut self) {
        while let Some(joined) = self.side_effects.join_next().await {
            log_side_effect(joined);
        }
    }

    /// Empties the displayed list without cancelling anything.
    pub fn clear(&mut self) {
        self.state = FetchState::Success(Vec::new());
    }

    fn finish(&mut self, joined: Result<ListCompletion, JoinError>) -> ListTransition {
        match joined {
            Ok(completion) => self.apply(completion),
            Err(err) => {
                tracing::error!("List request task failed: {err}");
                let message = self
                    .request
                    .as_ref()
                    .map_or(SEARCH_ERROR_MESSAGE, ListRequest::failure_message);
                self.state = FetchState::Error(String::from(message));
                ListTransition::Failed
            }
        }
    }

    fn record_search(&mut self, record: SearchRecord) {
        let analytics = Arc::clone(&self.analytics);
        self.side_effects.spawn(async move {
            if let Err(err) = analytics.record_search(&record).await {
                tracing::warn!(
                    search_term = %record.search_term,
                    "Failed to record search: {err:#}"
                );
            }
        });
    }

    fn reap_side_effects(&mut self) {
        while let Some(joined) = self.side_effects.try_join_next() {
            log_side_effect(joined);
        }
    }
}

impl<C, A> Drop for ListController<C, A> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        // Analytics writes outlive the controller.
        self.side_effects.detach_all();
    }
}

fn log_side_effect(joined: Result<(), JoinError>) {
    if let Err(err) = joined {
        tracing::warn!("Analytics task failed: {err}");
    }
}
