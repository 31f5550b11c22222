//! Browse session: the single owner of all browser state.
//!
//! Input events flow into the session, the session drives its controllers,
//! and the presentation layer only reads the resulting state back.

use std::sync::Arc;
use std::time::Duration;

use cinefind_api::analytics::AnalyticsStore;
use cinefind_api::tmdb::CatalogApi;
use tokio::time::Instant;

use crate::debounce::Debouncer;
use crate::detail::DetailController;
use crate::list::{ListController, ListRequest, ListTransition};
use crate::navigation::Route;

/// Browser state: search box, movie list, trending strip and detail overlay.
#[derive(Debug)]
pub struct BrowseSession<C, A> {
    /// Raw text of the search box.
    search_text: String,
    /// Settles `search_text` into queries.
    debouncer: Debouncer,
    /// Search / discover list.
    search: ListController<C, A>,
    /// Trending list, loaded once at mount.
    trending: ListController<C, A>,
    /// Detail overlay.
    detail: DetailController<C>,
    /// Current location.
    route: Route,
}

impl<C, A> BrowseSession<C, A>
where
    C: CatalogApi + Send + Sync + 'static,
    A: AnalyticsStore + Send + Sync + 'static,
{
    /// Creates an unmounted session with the given debounce quiet period.
    #[must_use]
    pub fn new(catalog: Arc<C>, analytics: Arc<A>, quiet: Duration) -> Self {
        Self {
            search_text: String::new(),
            debouncer: Debouncer::with_initial(quiet, ""),
            search: ListController::new(Arc::clone(&catalog), Arc::clone(&analytics)),
            trending: ListController::new(Arc::clone(&catalog), analytics),
            detail: DetailController::new(catalog),
            route: Route::Home,
        }
    }

    /// Starts the initial discover and trending requests.
    pub fn mount(&mut self) {
        tracing::debug!("Mounting browse session");
        self.search.submit(ListRequest::for_query(&self.search_text));
        self.trending.submit(ListRequest::Trending);
    }

    /// Replaces the search text; the query settles after the quiet period.
    pub fn set_search_text(&mut self, text: impl Into<String>, now: Instant) {
        self.search_text = text.into();
        self.debouncer.input(self.search_text.clone(), now);
    }

    /// Appends one character to the search text.
    pub fn push_char(&mut self, ch: char, now: Instant) {
        let mut text = self.search_text.clone();
        text.push(ch);
        self.set_search_text(text, now);
    }

    /// Removes the last character of the search text.
    pub fn pop_char(&mut self, now: Instant) {
        let mut text = self.search_text.clone();
        if text.pop().is_some() {
            self.set_search_text(text, now);
        }
    }

    /// Advances the session: submits a settled query and applies finished
    /// requests. Returns `true` when anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if let Some(query) = self.debouncer.poll(now) {
            self.search.submit(ListRequest::for_query(&query));
            changed = true;
        }
        if let Some(transition) = self.search.poll() {
            self.on_search_transition(transition);
            changed = true;
        }
        if self.trending.poll().is_some() {
            changed = true;
        }
        if self.detail.poll() {
            changed = true;
        }
        changed
    }

    /// Waits for every in-flight request and analytics write.
    pub async fn settle(&mut self) {
        if let Some(transition) = self.search.settle().await {
            self.on_search_transition(transition);
        }
        self.trending.settle().await;
        self.detail.settle().await;
        self.search.flush_side_effects().await;
    }

    /// Navigates to `route`, opening or closing the detail overlay.
    pub fn navigate(&mut self, route: Route) {
        match route {
            Route::Home => self.close_detail(),
            Route::Movie(movie_id) => self.select_movie(movie_id),
        }
    }

    /// Pushes the detail route for `movie_id` and opens it.
    pub fn select_movie(&mut self, movie_id: u64) {
        self.route = Route::Movie(movie_id);
        self.detail.open(movie_id);
    }

    /// Returns to the root route and releases the detail data.
    pub fn close_detail(&mut self) {
        self.route = Route::Home;
        self.detail.close();
    }

    /// Returns the raw search text.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Returns the instant at which pending search text settles.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Returns the search / discover list.
    #[must_use]
    pub const fn search(&self) -> &ListController<C, A> {
        &self.search
    }

    /// Returns the trending list.
    #[must_use]
    pub const fn trending(&self) -> &ListController<C, A> {
        &self.trending
    }

    /// Returns the detail overlay controller.
    #[must_use]
    pub const fn detail(&self) -> &DetailController<C> {
        &self.detail
    }

    /// Returns the current route.
    #[must_use]
    pub const fn route(&self) -> Route {
        self.route
    }

    fn on_search_transition(&mut self, transition: ListTransition) {
        if transition == ListTransition::AppFailure {
            self.trending.clear();
        }
    }
}
