//! Error types for search, storage, favorites and configuration.

use thiserror::Error;

use crate::types::ValidationError;

/// A search request that did not produce a result set.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GitHub API error: {status}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Raised by non-HTTP search backends.
    #[error("search failed: {0}")]
    Client(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The persisted blob is not valid serialized data.
    #[error("stored data is corrupted: {0}")]
    StorageCorruption(#[from] serde_json::Error),

    /// A write to the store did not complete.
    #[error("write to store failed: {0}")]
    Persistence(String),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("not a valid repository: {0}")]
    Invalid(#[from] ValidationError),

    #[error("favorites service has shut down")]
    Closed,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no HOME directory set")]
    NoHome,

    #[error("can't read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("can't parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
