//! `AppwriteClient` - Appwrite document store client for search counters.

use anyhow::{Context, Result, bail};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use super::api::AnalyticsStore;
use super::types::SearchRecord;

/// Attribute holding the counter key.
const SEARCH_TERM_ATTRIBUTE: &str = "searchTerm";

/// Attribute holding the running count.
const COUNT_ATTRIBUTE: &str = "count";

/// Placeholder asking the server to generate a document ID.
const UNIQUE_ID: &str = "unique()";

/// Appwrite REST client scoped to one collection.
#[derive(Debug)]
pub struct AppwriteClient {
    /// HTTP client.
    http_client: Client,
    /// API endpoint (e.g. `https://cloud.appwrite.io/v1/`).
    endpoint: Url,
    /// Project ID (`X-Appwrite-Project`).
    project_id: String,
    /// Database ID.
    database_id: String,
    /// Collection ID.
    collection_id: String,
    /// Optional API key (`X-Appwrite-Key`).
    api_key: Option<String>,
}

/// Builder for `AppwriteClient`.
#[derive(Debug, Default)]
pub struct AppwriteClientBuilder {
    endpoint: Option<Url>,
    project_id: Option<String>,
    database_id: Option<String>,
    collection_id: Option<String>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl AppwriteClientBuilder {
    /// Sets the API endpoint (required). A trailing slash is added if missing.
    #[must_use]
    pub fn endpoint(mut self, url: Url) -> Self {
        self.endpoint = Some(url);
        self
    }

    /// Sets the project ID (required).
    #[must_use]
    pub fn project_id(mut self, id: impl Into<String>) -> Self {
        self.project_id = Some(id.into());
        self
    }

    /// Sets the database ID (required).
    #[must_use]
    pub fn database_id(mut self, id: impl Into<String>) -> Self {
        self.database_id = Some(id.into());
        self
    }

    /// Sets the collection ID (required).
    #[must_use]
    pub fn collection_id(mut self, id: impl Into<String>) -> Self {
        self.collection_id = Some(id.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or the HTTP client
    /// fails to build.
    pub fn build(self) -> Result<AppwriteClient> {
        let mut endpoint = self.endpoint.context("endpoint is required")?;
        let project_id = self.project_id.context("project_id is required")?;
        let database_id = self.database_id.context("database_id is required")?;
        let collection_id = self.collection_id.context("collection_id is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .build()
            .context("failed to build HTTP client")?;

        Ok(AppwriteClient {
            http_client,
            endpoint,
            project_id,
            database_id,
            collection_id,
            api_key: self.api_key.filter(|k| !k.is_empty()),
        })
    }
}

/// Response from the list documents endpoint.
#[derive(Debug, Deserialize)]
struct DocumentList {
    /// Matching documents.
    #[serde(default)]
    documents: Vec<SearchDocument>,
}

/// A stored search counter.
#[derive(Debug, Deserialize)]
struct SearchDocument {
    /// Document ID.
    #[serde(rename = "$id")]
    id: String,
    /// Current count.
    #[serde(default)]
    count: u64,
}

/// An `equal` query in Appwrite's JSON query syntax.
#[derive(Debug, Serialize)]
struct EqualQuery<'a> {
    method: &'static str,
    attribute: &'static str,
    values: [&'a str; 1],
}

/// Body of the create document request.
#[derive(Debug, Serialize)]
struct CreateDocument<'a> {
    #[serde(rename = "documentId")]
    document_id: &'static str,
    data: SearchDocumentData<'a>,
}

/// Attributes of a new search counter.
#[derive(Debug, Serialize)]
struct SearchDocumentData<'a> {
    #[serde(rename = "searchTerm")]
    search_term: &'a str,
    count: u64,
    movie_id: u64,
    title: &'a str,
    poster_url: &'a str,
}

/// Body of the increment attribute request.
#[derive(Debug, Serialize)]
struct Increment {
    value: u64,
}

impl AppwriteClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> AppwriteClientBuilder {
        AppwriteClientBuilder::default()
    }

    /// Returns the URL of the collection's documents, with an optional suffix.
    fn documents_url(&self, suffix: &str) -> Result<Url> {
        let path = format!(
            "databases/{}/collections/{}/documents{suffix}",
            self.database_id, self.collection_id
        );
        self.endpoint
            .join(&path)
            .with_context(|| format!("failed to join URL path: {path}"))
    }

    /// Starts a request carrying the project and key headers.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id);
        match &self.api_key {
            Some(key) => builder.header("X-Appwrite-Key", key),
            None => builder,
        }
    }

    /// Finds the counter document for a search term.
    #[instrument(skip_all)]
    async fn find_document(&self, search_term: &str) -> Result<Option<SearchDocument>> {
        let query = serde_json::to_string(&EqualQuery {
            method: "equal",
            attribute: SEARCH_TERM_ATTRIBUTE,
            values: [search_term],
        })
        .context("failed to encode document query")?;

        let url = self.documents_url("")?;
        let response = self
            .request(Method::GET, url)
            .query(&[("queries[]", query)])
            .send()
            .await
            .context("request failed: list documents")?;
        let response = ensure_success(response, "list documents").await?;

        let list: DocumentList = response
            .json()
            .await
            .context("failed to decode JSON response: list documents")?;
        Ok(list.documents.into_iter().next())
    }

    /// Atomically increments a counter document on the server.
    #[instrument(skip_all)]
    async fn increment_count(&self, document_id: &str) -> Result<()> {
        let url = self.documents_url(&format!("/{document_id}/{COUNT_ATTRIBUTE}/increment"))?;
        let response = self
            .request(Method::PATCH, url)
            .json(&Increment { value: 1 })
            .send()
            .await
            .context("request failed: increment count")?;
        ensure_success(response, "increment count").await?;
        Ok(())
    }

    /// Creates a new counter document with count 1.
    #[instrument(skip_all)]
    async fn create_document(&self, record: &SearchRecord) -> Result<()> {
        let url = self.documents_url("")?;
        let body = CreateDocument {
            document_id: UNIQUE_ID,
            data: SearchDocumentData {
                search_term: &record.search_term,
                count: 1,
                movie_id: record.movie_id,
                title: &record.title,
                poster_url: &record.poster_url,
            },
        };
        let response = self
            .request(Method::POST, url)
            .json(&body)
            .send()
            .await
            .context("request failed: create document")?;
        ensure_success(response, "create document").await?;
        Ok(())
    }
}

impl AnalyticsStore for AppwriteClient {
    #[instrument(skip_all, fields(search_term = %record.search_term))]
    async fn record_search(&self, record: &SearchRecord) -> Result<()> {
        if let Some(document) = self.find_document(&record.search_term).await? {
            tracing::debug!(
                document_id = %document.id,
                count = document.count,
                "Incrementing search count"
            );
            self.increment_count(&document.id).await
        } else {
            tracing::debug!("Creating search count");
            self.create_document(record).await
        }
    }
}

/// Turns a non-success response into an error carrying the body.
async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<failed to read body>"));
    bail!("Appwrite API error (HTTP {status}) during {what}: {body}");
}
