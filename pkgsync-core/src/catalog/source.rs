//! Catalog sources
//!
//! The source list (sources.json) is a JSON array of URLs, in priority
//! order. Each URL serves a JSON array of package descriptors.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use super::descriptor::Catalog;
use super::error::{CatalogError, FetchError, Result, StoreError};
use super::store::JsonDocument;

/// Request timeout for source downloads
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Configured source URLs, highest priority first
#[derive(Debug, Clone)]
pub struct SourceList {
    document: JsonDocument<String>,
}

impl SourceList {
    /// Load the source list or start empty if the file does not exist
    pub fn load_from_path(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self {
            document: JsonDocument::load_or_empty(path)?,
        })
    }

    /// Save the source list
    pub fn save(&self) -> Result<(), StoreError> {
        self.document.save()
    }

    /// All configured source URLs in priority order
    pub fn urls(&self) -> &[String] {
        self.document.items()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Append a source with the lowest priority
    pub fn add(&mut self, url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CatalogError::Source(
                "Source URL must start with http:// or https://".to_string(),
            ));
        }

        if self.urls().iter().any(|u| u == url) {
            return Err(CatalogError::Source(format!(
                "Source '{url}' already exists"
            )));
        }

        self.document.items_mut().push(url.to_string());
        Ok(())
    }

    /// Remove a source by URL
    pub fn remove(&mut self, url: &str) -> Result<()> {
        let urls = self.document.items_mut();
        let initial_len = urls.len();
        urls.retain(|u| u != url);

        if urls.len() == initial_len {
            return Err(CatalogError::Source(format!("Source '{url}' not found")));
        }

        Ok(())
    }
}

/// Fetches and decodes the package list published at a source URL
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Catalog, FetchError>;
}

/// Fetches sources over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSourceFetcher {
    client: reqwest::Client,
}

impl HttpSourceFetcher {
    /// Create a fetcher with the default timeout
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a fetcher with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pkgsync/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Client { source })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch(&self, url: &str) -> Result<Catalog, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let content = response
            .text()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
