//! Error types for backend requests.

use thiserror::Error;

/// Errors that can occur when querying the monitoring backend.
///
/// These classify transport-level failures. Whether a failure is fatal or
/// merely degrades one source is decided by the engine, not here.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The response body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Could not reach the backend.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,
}

impl ClientError {
    /// Short reason string for use in degraded markers.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Connection(err.to_string())
        } else if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Http(err.to_string())
        }
    }
}
