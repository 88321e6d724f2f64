//! Error types for coinwatch

use thiserror::Error;

/// Errors that can occur when fetching market data from the upstream API
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network request failed (connection error or timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream returned a non-success HTTP status on a required call
    #[error("Remote error: {url} [{status}]")]
    Remote { url: String, status: u16 },

    /// Response body could not be parsed into the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Creates a Remote error from a URL and status code
    pub fn remote(url: impl Into<String>, status: u16) -> Self {
        Self::Remote {
            url: url.into(),
            status,
        }
    }

    /// True for transport-level failures that the refresh path swallows
    /// (a laggy or unreachable asset must not fail the whole cycle).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Errors raised by the snapshot history store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
