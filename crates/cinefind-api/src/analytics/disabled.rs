//! No-op analytics store used when no backend is configured.

use anyhow::Result;

use super::api::AnalyticsStore;
use super::types::SearchRecord;

/// Analytics store that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAnalytics;

impl AnalyticsStore for DisabledAnalytics {
    async fn record_search(&self, record: &SearchRecord) -> Result<()> {
        tracing::debug!(
            search_term = %record.search_term,
            movie_id = record.movie_id,
            "Analytics disabled, search not recorded"
        );
        Ok(())
    }
}
