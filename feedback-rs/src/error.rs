//! Error types for feedback-rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::time::Duration;
use thiserror::Error;

use crate::api::handlers::ApiError;
use crate::submission::ValidationErrors;

/// Result type alias for feedback operations
pub type Result<T> = std::result::Result<T, FeedbackError>;

/// Generic message returned for anything the caller cannot fix
pub const GENERIC_FAILURE: &str = "Failed to process feedback.";

/// Message returned when the payload fails schema validation
pub const INVALID_PAYLOAD: &str = "Invalid payload.";

/// Message returned when relay configuration is incomplete
pub const CONFIG_MISSING: &str = "Email env vars are not configured.";

#[derive(Error, Debug)]
pub enum FeedbackError {
    /// Request body is not JSON
    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Payload is JSON but breaks the submission schema
    #[error("Invalid payload: {0}")]
    Validation(ValidationErrors),

    /// Relay configuration missing or unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// The mail transport failed or rejected the message
    #[error("Relay error: {0}")]
    Relay(String),

    /// The mail transport did not answer in time
    #[error("Relay timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FeedbackError {
    /// HTTP status the caller sees for this error
    pub fn status(&self) -> StatusCode {
        match self {
            FeedbackError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FeedbackError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            FeedbackError::Validation(details) => ApiError::with_details(INVALID_PAYLOAD, details),
            FeedbackError::Config(_) => ApiError::new(CONFIG_MISSING),
            // Transport and credential details stay in the logs
            _ => ApiError::new(GENERIC_FAILURE),
        };

        (status, Json(body)).into_response()
    }
}
