//! `AnalyticsStore` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::SearchRecord;

/// Search analytics store trait.
///
/// Writes are upserts keyed by the normalized search term: an existing
/// counter is incremented, otherwise a new one is created with count 1.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(AnalyticsStore: Send)]
pub trait LocalAnalyticsStore {
    /// Records one search and its top result.
    ///
    /// # Errors
    ///
    /// Returns an error if any request to the store fails.
    async fn record_search(&self, record: &SearchRecord) -> Result<()>;
}
