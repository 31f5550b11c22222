//! In-memory catalog and analytics doubles for controller tests.
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, bail};
use cinefind_api::analytics::{AnalyticsStore, SearchRecord};
use cinefind_api::tmdb::{
    CatalogApi, CreditsResponse, MovieDetail, MovieListResponse, VideosResponse,
};

pub const SEARCH_BATMAN: &str = include_str!("../../../fixtures/tmdb/search_movie_batman.json");
pub const SEARCH_EMPTY: &str = include_str!("../../../fixtures/tmdb/search_movie_empty.json");
pub const SEARCH_APP_FAILURE: &str =
    include_str!("../../../fixtures/tmdb/search_movie_app_failure.json");
pub const DISCOVER_POPULAR: &str = include_str!("../../../fixtures/tmdb/discover_popular.json");
pub const TRENDING_DAY: &str = include_str!("../../../fixtures/tmdb/trending_day.json");
pub const DETAILS_155: &str = include_str!("../../../fixtures/tmdb/movie_details_155.json");
pub const CREDITS_155: &str = include_str!("../../../fixtures/tmdb/movie_credits_155.json");
pub const VIDEOS_155: &str = include_str!("../../../fixtures/tmdb/movie_videos_155.json");

/// Parses a fixture body.
pub fn parse<T: serde::de::DeserializeOwned>(json: &str) -> T {
    serde_json::from_str(json).unwrap()
}

/// A canned reply; the error side becomes an `anyhow` error.
type Reply<T> = std::result::Result<T, String>;

/// Catalog double keyed by request: `discover`, `trending`, `search:{q}`,
/// `details:{id}`, `credits:{id}` and `videos:{id}`.
///
/// Unknown list requests answer with an empty list, unknown per-movie
/// requests with an error.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    lists: HashMap<String, Reply<MovieListResponse>>,
    details: HashMap<u64, Reply<MovieDetail>>,
    credits: HashMap<u64, Reply<CreditsResponse>>,
    videos: HashMap<u64, Reply<VideosResponse>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(mut self, key: &str, json: &str) -> Self {
        self.lists.insert(String::from(key), Ok(parse(json)));
        self
    }

    pub fn list_error(mut self, key: &str, message: &str) -> Self {
        self.lists.insert(String::from(key), Err(String::from(message)));
        self
    }

    pub fn movie_155(mut self) -> Self {
        self.details.insert(155, Ok(parse(DETAILS_155)));
        self.credits.insert(155, Ok(parse(CREDITS_155)));
        self.videos.insert(155, Ok(parse(VIDEOS_155)));
        self
    }

    pub fn details(mut self, movie_id: u64, reply: Reply<MovieDetail>) -> Self {
        self.details.insert(movie_id, reply);
        self
    }

    pub fn credits(mut self, movie_id: u64, reply: Reply<CreditsResponse>) -> Self {
        self.credits.insert(movie_id, reply);
        self
    }

    pub fn videos(mut self, movie_id: u64, reply: Reply<VideosResponse>) -> Self {
        self.videos.insert(movie_id, reply);
        self
    }

    /// Delays the reply to `key` by `delay` (tokio time).
    pub fn delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(String::from(key), delay);
        self
    }

    /// Returns the request keys seen so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the request keys that ran past their delay, in order.
    ///
    /// A request whose task was aborted while delayed never shows up here.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    async fn enter(&self, key: &str) {
        self.calls.lock().unwrap().push(String::from(key));
        if let Some(delay) = self.delays.get(key).copied() {
            tokio::time::sleep(delay).await;
        }
        self.completed.lock().unwrap().push(String::from(key));
    }

    async fn list_reply(&self, key: String) -> Result<MovieListResponse> {
        self.enter(&key).await;
        match self.lists.get(&key).cloned() {
            Some(reply) => reply.map_err(anyhow::Error::msg),
            None => Ok(MovieListResponse::default()),
        }
    }

    async fn movie_reply<T: Clone + Send + Sync>(
        &self,
        key: String,
        replies: &HashMap<u64, Reply<T>>,
        movie_id: u64,
    ) -> Result<T> {
        self.enter(&key).await;
        match replies.get(&movie_id).cloned() {
            Some(reply) => reply.map_err(anyhow::Error::msg),
            None => bail!("no reply for {key}"),
        }
    }
}

impl CatalogApi for FakeCatalog {
    async fn search_movies(&self, query: &str) -> Result<MovieListResponse> {
        self.list_reply(format!("search:{query}")).await
    }

    async fn discover_movies(&self) -> Result<MovieListResponse> {
        self.list_reply(String::from("discover")).await
    }

    async fn trending_movies(&self) -> Result<MovieListResponse> {
        self.list_reply(String::from("trending")).await
    }

    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetail> {
        self.movie_reply(format!("details:{movie_id}"), &self.details, movie_id).await
    }

    async fn movie_credits(&self, movie_id: u64) -> Result<CreditsResponse> {
        self.movie_reply(format!("credits:{movie_id}"), &self.credits, movie_id).await
    }

    async fn movie_videos(&self, movie_id: u64) -> Result<VideosResponse> {
        self.movie_reply(format!("videos:{movie_id}"), &self.videos, movie_id).await
    }
}

/// Analytics double recording every attempted write.
#[derive(Debug, Default)]
pub struct FakeAnalytics {
    records: Mutex<Vec<SearchRecord>>,
    fail: bool,
}

impl FakeAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            records: Mutex::default(),
            fail: true,
        }
    }

    pub fn records(&self) -> Vec<SearchRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl AnalyticsStore for FakeAnalytics {
    async fn record_search(&self, record: &SearchRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        if self.fail {
            bail!("analytics backend unavailable");
        }
        Ok(())
    }
}
