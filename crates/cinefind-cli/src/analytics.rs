//! Analytics backend selection.

use anyhow::{Context, Result};
use cinefind_api::analytics::{AnalyticsStore, AppwriteClient, DisabledAnalytics, SearchRecord};
use url::Url;

use crate::config::AnalyticsConfig;

/// The configured analytics store.
#[derive(Debug)]
pub enum AnalyticsBackend {
    /// Appwrite document store.
    Appwrite(AppwriteClient),
    /// Nothing recorded.
    Disabled(DisabledAnalytics),
}

impl AnalyticsBackend {
    /// Builds the backend from config and the optional API key.
    ///
    /// # Errors
    ///
    /// Returns an error if analytics is enabled but a required setting is
    /// missing or invalid.
    pub fn from_config(
        config: &AnalyticsConfig,
        api_key: Option<String>,
        user_agent: &str,
    ) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::Disabled(DisabledAnalytics));
        }

        let endpoint = config
            .endpoint
            .as_deref()
            .context("analytics.endpoint is required when analytics is enabled")?;
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid analytics.endpoint: {endpoint}"))?;
        let project_id = config
            .project_id
            .as_deref()
            .context("analytics.project_id is required when analytics is enabled")?;
        let database_id = config
            .database_id
            .as_deref()
            .context("analytics.database_id is required when analytics is enabled")?;
        let collection_id = config
            .collection_id
            .as_deref()
            .context("analytics.collection_id is required when analytics is enabled")?;

        let mut builder = AppwriteClient::builder()
            .endpoint(endpoint)
            .project_id(project_id)
            .database_id(database_id)
            .collection_id(collection_id)
            .user_agent(user_agent);
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        let client = builder.build().context("failed to build Appwrite client")?;
        Ok(Self::Appwrite(client))
    }
}

impl AnalyticsStore for AnalyticsBackend {
    async fn record_search(&self, record: &SearchRecord) -> Result<()> {
        match self {
            Self::Appwrite(client) => client.record_search(record).await,
            Self::Disabled(disabled) => disabled.record_search(record).await,
        }
    }
}
