//! Error types for feedback-client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures that never produced a usable server answer
#[derive(Error, Debug)]
pub enum ClientError {
    /// Request could not be sent or the response not read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Success status, but the body was not JSON
    #[error("Invalid response body: {0}")]
    Body(#[from] serde_json::Error),
}
