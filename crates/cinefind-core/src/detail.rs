//! Single-movie detail controller.
//!
//! Opening a movie issues three concurrent requests (details, credits and
//! videos). Individual failures leave the matching part absent; the view
//! only fails when all three do.

use std::sync::Arc;

use anyhow::Result;
use cinefind_api::tmdb::{
    CastEntry, CatalogApi, CreditsResponse, MovieDetail, Video, VideosResponse,
};
use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};

/// Maximum number of cast entries kept.
pub const CAST_LIMIT: usize = 6;

/// User-facing message when no part of a movie could be loaded.
pub const DETAIL_ERROR_MESSAGE: &str = "Failed to load movie details.";

/// Everything known about one open movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieView {
    /// TMDB movie ID.
    pub movie_id: u64,
    /// Full details, absent if that request failed.
    pub detail: Option<MovieDetail>,
    /// Leading cast in billing order, at most [`CAST_LIMIT`] entries.
    pub cast: Vec<CastEntry>,
    /// First YouTube trailer, if any.
    pub trailer: Option<Video>,
}

impl MovieView {
    /// Returns the trailer's watch URL.
    #[must_use]
    pub fn trailer_url(&self) -> Option<String> {
        self.trailer.as_ref().map(Video::youtube_url)
    }
}

/// State of the detail overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailState {
    /// No movie open.
    #[default]
    Closed,
    /// Requests for the movie are in flight.
    Loading(u64),
    /// At least one part loaded.
    Ready(MovieView),
    /// Every part failed.
    Failed {
        /// TMDB movie ID.
        movie_id: u64,
        /// User-facing message.
        message: String,
    },
}

impl DetailState {
    /// Returns the ID of the open movie.
    #[must_use]
    pub const fn movie_id(&self) -> Option<u64> {
        match self {
            Self::Closed => None,
            Self::Loading(movie_id) | Self::Failed { movie_id, .. } => Some(*movie_id),
            Self::Ready(view) => Some(view.movie_id),
        }
    }

    /// Returns the loaded view.
    #[must_use]
    pub const fn view(&self) -> Option<&MovieView> {
        match self {
            Self::Ready(view) => Some(view),
            _ => None,
        }
    }

    /// Returns `true` while requests are in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }
}

/// Results of the three requests for one movie.
#[derive(Debug)]
pub struct DetailCompletion {
    /// Generation of the opening call.
    pub generation: u64,
    /// TMDB movie ID.
    pub movie_id: u64,
    /// `movie/{id}` response.
    pub details: Result<MovieDetail>,
    /// `movie/{id}/credits` response.
    pub credits: Result<CreditsResponse>,
    /// `movie/{id}/videos` response.
    pub videos: Result<VideosResponse>,
}

/// State machine for the detail overlay.
#[derive(Debug)]
pub struct DetailController<C> {
    /// Catalog client.
    catalog: Arc<C>,
    /// Current state.
    state: DetailState,
    /// Generation of the authoritative open.
    generation: u64,
    /// Task of the authoritative open.
    in_flight: Option<JoinHandle<DetailCompletion>>,
}

impl<C> DetailController<C>
where
    C: CatalogApi + Send + Sync + 'static,
{
    /// Creates a closed controller.
    #[must_use]
    pub const fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            state: DetailState::Closed,
            generation: 0,
            in_flight: None,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &DetailState {
        &self.state
    }

    /// Opens `movie_id`, superseding any other open movie.
    ///
    /// Returns `false` when the movie is already open (a failed movie is
    /// retried). Must be called within a tokio runtime.
    pub fn open(&mut self, movie_id: u64) -> bool {
        if self.state.movie_id() == Some(movie_id)
            && !matches!(self.state, DetailState::Failed { .. })
        {
            return false;
        }
        self.abort_in_flight();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        tracing::debug!(generation, movie_id, "Opening movie detail");

        self.state = DetailState::Loading(movie_id);

        let catalog = Arc::clone(&self.catalog);
        self.in_flight = Some(tokio::spawn(async move {
            let (details, credits, videos) = tokio::join!(
                catalog.movie_details(movie_id),
                catalog.movie_credits(movie_id),
                catalog.movie_videos(movie_id),
            );
            DetailCompletion {
                generation,
                movie_id,
                details,
                credits,
                videos,
            }
        }));
        true
    }

    /// Reconciles a completion. Returns `false` if it was stale.
    pub fn apply(&mut self, completion: DetailCompletion) -> bool {
        let movie_id = completion.movie_id;
        if completion.generation != self.generation || self.state.movie_id() != Some(movie_id) {
            tracing::debug!(
                generation = completion.generation,
                current = self.generation,
                movie_id,
                "Discarding stale movie detail"
            );
            return false;
        }
        self.abort_in_flight();

        let detail = keep_part(movie_id, "details", completion.details);
        let credits = keep_part(movie_id, "credits", completion.credits);
        let videos = keep_part(movie_id, "videos", completion.videos);

        if detail.is_none() && credits.is_none() && videos.is_none() {
            tracing::error!(movie_id, "Every movie detail request failed");
            self.state = DetailState::Failed {
                movie_id,
                message: String::from(DETAIL_ERROR_MESSAGE),
            };
            return true;
        }

        let cast = credits
            .map(|credits| credits.cast.into_iter().take(CAST_LIMIT).collect())
            .unwrap_or_default();
        let trailer = videos.and_then(|videos| videos.trailer().cloned());
        self.state = DetailState::Ready(MovieView {
            movie_id,
            detail,
            cast,
            trailer,
        });
        true
    }

    /// Applies the in-flight completion if it has finished, without waiting.
    /// Returns `true` when the state changed.
    pub fn poll(&mut self) -> bool {
        let Some(handle) = self.in_flight.as_mut() else {
            return false;
        };
        if !handle.is_finished() {
            return false;
        }
        let Some(joined) = handle.now_or_never() else {
            return false;
        };
        self.in_flight = None;
        self.finish(joined)
    }

    /// Waits for the in-flight completion and applies it.
    pub async fn settle(&mut self) -> bool {
        let Some(handle) = self.in_flight.take() else {
            return false;
        };
        let joined = handle.await;
        self.finish(joined)
    }

    /// Aborts any in-flight requests and releases the loaded data.
    pub fn close(&mut self) {
        self.abort_in_flight();
        if let Some(movie_id) = self.state.movie_id() {
            tracing::debug!(movie_id, "Closing movie detail");
        }
        self.state = DetailState::Closed;
    }

    fn finish(&mut self, joined: Result<DetailCompletion, JoinError>) -> bool {
        match joined {
            Ok(completion) => self.apply(completion),
            Err(err) => {
                tracing::error!("Movie detail task failed: {err}");
                let Some(movie_id) = self.state.movie_id() else {
                    return false;
                };
                self.state = DetailState::Failed {
                    movie_id,
                    message: String::from(DETAIL_ERROR_MESSAGE),
                };
                true
            }
        }
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl<C> Drop for DetailController<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

/// Keeps a successful part, logging a failed one.
fn keep_part<T>(movie_id: u64, part: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(movie_id, part, "Failed to load movie {part}: {err:#}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use super::*;
    use crate::testing::{CREDITS_155, DETAILS_155, FakeCatalog, parse};

    fn controller(catalog: FakeCatalog) -> (DetailController<FakeCatalog>, Arc<FakeCatalog>) {
        let catalog = Arc::new(catalog);
        (DetailController::new(Arc::clone(&catalog)), catalog)
    }

    #[tokio::test]
    async fn test_open_loads_all_three_parts() {
        // Arrange
        let (mut detail, catalog) = controller(FakeCatalog::new().movie_155());

        // Act
        assert!(detail.open(155));
        assert_eq!(detail.state(), &DetailState::Loading(155));
        assert!(detail.settle().await);

        // Assert
        let view = detail.state().view().unwrap();
        assert_eq!(view.movie_id, 155);
        assert_eq!(view.detail.as_ref().unwrap().title, "The Dark Knight");
        assert_eq!(view.cast.len(), CAST_LIMIT);
        assert_eq!(view.cast.first().unwrap().name, "Christian Bale");
        assert_eq!(view.trailer.as_ref().unwrap().key, "EXeTwQWrcwY");
        assert_eq!(
            view.trailer_url().as_deref(),
            Some("https://www.youtube.com/watch?v=EXeTwQWrcwY")
        );
        let mut calls = catalog.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                String::from("credits:155"),
                String::from("details:155"),
                String::from("videos:155"),
            ]
        );
    }

    #[tokio::test]
    async fn test_videos_failure_leaves_trailer_absent() {
        // Arrange
        let (mut detail, _) = controller(
            FakeCatalog::new()
                .details(155, Ok(parse(DETAILS_155)))
                .credits(155, Ok(parse(CREDITS_155)))
                .videos(155, Err(String::from("TMDB API error (HTTP 500)"))),
        );

        // Act
        detail.open(155);
        detail.settle().await;

        // Assert
        let view = detail.state().view().unwrap();
        assert!(view.detail.is_some());
        assert_eq!(view.cast.len(), 6);
        assert!(view.trailer.is_none());
        assert!(view.trailer_url().is_none());
    }

    #[tokio::test]
    async fn test_cast_is_truncated_in_source_order() {
        // Arrange
        let credits: CreditsResponse = parse(CREDITS_155);
        let expected: Vec<String> = credits
            .cast
            .iter()
            .take(CAST_LIMIT)
            .map(|c| c.name.clone())
            .collect();
        let (mut detail, _) = controller(FakeCatalog::new().credits(155, Ok(credits)));

        // Act
        detail.open(155);
        detail.settle().await;

        // Assert
        let view = detail.state().view().unwrap();
        assert!(view.detail.is_none());
        let names: Vec<String> = view.cast.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_all_parts_failing_is_failed() {
        // Arrange
        let (mut detail, _) = controller(FakeCatalog::new());

        // Act
        detail.open(42);
        detail.settle().await;

        // Assert
        assert_eq!(
            detail.state(),
            &DetailState::Failed {
                movie_id: 42,
                message: String::from(DETAIL_ERROR_MESSAGE),
            }
        );
        assert_eq!(detail.state().movie_id(), Some(42));
    }

    #[tokio::test]
    async fn test_failed_movie_can_be_retried() {
        // Arrange
        let (mut detail, catalog) = controller(FakeCatalog::new());
        detail.open(42);
        detail.settle().await;

        // Act
        let reopened = detail.open(42);
        detail.settle().await;

        // Assert
        assert!(reopened);
        assert_eq!(catalog.calls().len(), 6);
    }

    #[tokio::test]
    async fn test_open_same_movie_is_noop() {
        // Arrange
        let (mut detail, catalog) = controller(FakeCatalog::new().movie_155());
        detail.open(155);
        detail.settle().await;

        // Act
        let reopened = detail.open(155);

        // Assert
        assert!(!reopened);
        assert!(!detail.settle().await);
        assert_eq!(catalog.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_reopen_after_close_refetches_same_data() {
        // Arrange
        let (mut detail, catalog) = controller(FakeCatalog::new().movie_155());
        detail.open(155);
        detail.settle().await;
        let first = detail.state().clone();

        // Act
        detail.close();
        let closed = detail.state().clone();
        detail.open(155);
        detail.settle().await;

        // Assert
        assert_eq!(closed, DetailState::Closed);
        assert_eq!(detail.state(), &first);
        assert_eq!(catalog.calls().len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_movies_discards_previous() {
        // Arrange
        let batman = MovieDetail {
            id: 268,
            title: String::from("Batman"),
            ..MovieDetail::default()
        };
        let (mut detail, catalog) = controller(
            FakeCatalog::new()
                .movie_155()
                .details(268, Ok(batman))
                .delay("details:155", Duration::from_secs(2)),
        );
        detail.open(155);
        tokio::task::yield_now().await;

        // Act
        detail.open(268);
        detail.settle().await;
        tokio::time::sleep(Duration::from_secs(3)).await;

        // Assert
        assert!(!detail.poll());
        let view = detail.state().view().unwrap();
        assert_eq!(view.movie_id, 268);
        assert_eq!(view.detail.as_ref().unwrap().title, "Batman");
        assert!(view.cast.is_empty());
        assert!(view.trailer.is_none());
        assert!(!catalog.completed().contains(&String::from("details:155")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_in_flight_requests() {
        // Arrange
        let (mut detail, catalog) = controller(
            FakeCatalog::new()
                .movie_155()
                .delay("details:155", Duration::from_secs(1))
                .delay("credits:155", Duration::from_secs(1))
                .delay("videos:155", Duration::from_secs(1)),
        );
        detail.open(155);
        tokio::task::yield_now().await;

        // Act
        drop(detail);
        tokio::time::sleep(Duration::from_secs(2)).await;

        // Assert
        assert_eq!(catalog.calls().len(), 3);
        assert!(catalog.completed().is_empty());
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        // Arrange
        let (mut detail, _) = controller(FakeCatalog::new().movie_155());
        detail.open(155);
        detail.close();

        // Act
        let accepted = detail.apply(DetailCompletion {
            generation: 1,
            movie_id: 155,
            details: Ok(parse(DETAILS_155)),
            credits: Ok(parse(CREDITS_155)),
            videos: Ok(VideosResponse::default()),
        });

        // Assert
        assert!(!accepted);
        assert_eq!(detail.state(), &DetailState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_waits_for_slowest_part() {
        // Arrange
        let (mut detail, _) = controller(
            FakeCatalog::new()
                .movie_155()
                .delay("videos:155", Duration::from_millis(400)),
        );
        detail.open(155);

        // Act
        tokio::time::sleep(Duration::from_millis(100)).await;
        let early = detail.poll();
        tokio::time::sleep(Duration::from_millis(400)).await;
        let ready = detail.poll();

        // Assert
        assert!(!early);
        assert!(ready);
        assert!(detail.state().view().unwrap().trailer.is_some());
    }
}
