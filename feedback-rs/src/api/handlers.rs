//! API request handlers

use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};

use crate::config::MailConfig;
use crate::error::{FeedbackError, Result};
use crate::relay::{ConfigSource, FeedbackMail, MailRelay, MailRelayConfig};
use crate::submission::{FeedbackSubmission, ValidationErrors};

/// Shared application state
pub struct AppState {
    pub relay: Arc<dyn MailRelay>,
    /// Where relay settings are read from on each request
    pub env: ConfigSource,
    pub mail: MailConfig,
}

/// Acknowledgment body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ValidationErrors>,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
            details: None,
        }
    }

    pub fn with_details(msg: &str, details: ValidationErrors) -> Self {
        Self {
            error: msg.to_string(),
            details: Some(details),
        }
    }
}

/// POST /api/feedback - Validate a submission and relay it by mail
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> std::result::Result<Json<Ack>, FeedbackError> {
    let span = info_span!("feedback", id = %uuid::Uuid::new_v4());

    async move {
        match process_feedback(&state, &body).await {
            Ok(ack) => Ok(Json(ack)),
            Err(e) => {
                match &e {
                    FeedbackError::Validation(details) => {
                        debug!("Rejected feedback payload: {}", details)
                    }
                    FeedbackError::Config(msg) => {
                        error!("Mail relay is not configured: {}", msg)
                    }
                    other => error!("Error processing feedback: {}", other),
                }
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}

/// Run one submission through validation, the honeypot and the relay
pub async fn process_feedback(state: &AppState, body: &[u8]) -> Result<Ack> {
    let payload: serde_json::Value = serde_json::from_slice(body)?;

    let submission =
        FeedbackSubmission::from_json(&payload).map_err(FeedbackError::Validation)?;

    // Honeypot: pretend success so bots do not retry
    if submission.is_spam() {
        debug!("Honeypot field filled, dropping submission");
        return Ok(Ack::ok());
    }

    let relay_config = MailRelayConfig::load(&state.env)?;
    let mail = FeedbackMail::compose(&submission, &relay_config, &state.mail);

    state.relay.relay(&relay_config, &mail).await?;

    info!("Feedback relayed to {}", relay_config.recipient);
    Ok(Ack::ok())
}

/// GET /api/health - Liveness check
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "service": "feedback-rs",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
