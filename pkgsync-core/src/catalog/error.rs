//! Catalog error types with clear, actionable messages

use std::path::PathBuf;
use thiserror::Error;

use super::version::VersionError;

/// Failures while fetching and decoding a remote source
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    #[error("Failed to create HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    /// The request could not be sent or the connection failed
    #[error("Failed to fetch package list from {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("Failed to fetch package list: HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The body was not a JSON array of package descriptors
    #[error("Failed to parse package list from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while loading or saving a JSON document on disk
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the document
    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document exists but is not valid
    #[error("Failed to parse {path} (corrupted or invalid format)")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize the in-memory collection
    #[error("Failed to serialize {path}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the document
    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level catalog error
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A descriptor carried a malformed version
    #[error(transparent)]
    Version(#[from] VersionError),

    /// A source could not be fetched; the refresh was aborted
    #[error("Refresh aborted: source '{source_url}' failed")]
    Fetch {
        source_url: String,
        #[source]
        source: FetchError,
    },

    /// The HTTP client could not be set up
    #[error("Failed to initialize source fetcher")]
    HttpClient(#[source] FetchError),

    /// Reading or writing a document failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A source URL was rejected or not found in the source list
    #[error("{0}")]
    Source(String),
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
