//! Error types for directory and asset requests.

use thiserror::Error;

/// Errors raised while talking to the remote directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A listing page could not be retrieved within the retry budget.
    #[error("Directory unavailable at {url} after {attempts} attempts: {reason}")]
    RemoteUnavailable {
        url: String,
        attempts: u32,
        reason: String,
    },

    /// An avatar could not be downloaded within the retry budget.
    #[error("Asset unavailable at {url} after {attempts} attempts: {reason}")]
    AssetUnavailable {
        url: String,
        attempts: u32,
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Failure of a single request attempt.
///
/// Attempt errors never escape the crate: once the retry budget is spent the
/// last one is folded into a [`DirectoryError`].
#[derive(Debug, Error)]
pub(crate) enum AttemptError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed page body: {0}")]
    Body(#[from] serde_json::Error),
}
