//! Error types for device sources.

use thiserror::Error;

/// Errors that can occur while talking to a device source.
///
/// Every variant is recoverable from the session's point of view: a failed
/// list fetch leaves the previous snapshot on screen and a failed probe only
/// produces a notification.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The server answered with a non-success status code.
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// The configured base URL could not be used.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request failed before a response was received.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The response body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Local I/O failed (file source).
    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),

    /// The source cannot perform this operation.
    #[error("Not supported: {0}")]
    Unsupported(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::Http {
                status: status.as_u16(),
            }
        } else {
            SourceError::Connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(err.to_string())
    }
}
