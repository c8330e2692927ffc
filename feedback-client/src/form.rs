//! Feedback form state and submission

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Minimum trimmed message length accepted by the server
pub const MIN_MESSAGE_LEN: usize = 8;

pub const SUCCESS_TEXT: &str = "Sent. We’ll come back with pressure.";
pub const GENERIC_ERROR_TEXT: &str = "Something broke. Try again.";
pub const NETWORK_ERROR_TEXT: &str = "Network error. Try again.";

/// The four form fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub name: String,
    pub contact: String,
    pub message: String,
    /// Honeypot, hidden from humans
    pub website: String,
}

impl FormFields {
    /// Payload as sent to the server: visible fields trimmed, honeypot as typed
    pub fn to_payload(&self) -> FormFields {
        FormFields {
            name: self.name.trim().to_string(),
            contact: self.contact.trim().to_string(),
            message: self.message.trim().to_string(),
            website: self.website.clone(),
        }
    }
}

/// Submission status shown next to the send button
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Sending,
    Success(String),
    Error(String),
}

impl Status {
    /// Text shown for this status, if any
    pub fn render(&self) -> Option<String> {
        match self {
            Status::Idle => None,
            Status::Sending => Some("sending…".to_string()),
            Status::Success(text) => Some(format!("✓ {}", text)),
            Status::Error(text) => Some(format!("× {}", text)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Server answer that carried a readable body
enum Outcome {
    Accepted,
    Rejected(String),
}

/// Feedback form bound to one endpoint
///
/// # Examples
/// ```no_run
/// use feedback_client::FeedbackForm;
///
/// # async fn example() {
/// let mut form = FeedbackForm::new("https://ndgg.studio/api/feedback");
/// form.fields_mut().message = "We need a launch site.".to_string();
///
/// if form.can_submit() {
///     let status = form.submit().await;
///     println!("{:?}", status.render());
/// }
/// # }
/// ```
pub struct FeedbackForm {
    client: reqwest::Client,
    endpoint: String,
    fields: FormFields,
    status: Status,
}

impl FeedbackForm {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            fields: FormFields::default(),
            status: Status::Idle,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Whether the send button is enabled
    pub fn can_submit(&self) -> bool {
        if self.status == Status::Sending {
            return false;
        }
        if !self.fields.website.trim().is_empty() {
            return false;
        }
        self.fields.message.trim().chars().count() >= MIN_MESSAGE_LEN
    }

    /// Send the form once. Does nothing while [`can_submit`](Self::can_submit) is false.
    pub async fn submit(&mut self) -> &Status {
        if !self.can_submit() {
            debug!("Submission blocked by local validation");
            return &self.status;
        }

        self.status = Status::Sending;
        let payload = self.fields.to_payload();

        self.status = match self.send(&payload).await {
            Ok(Outcome::Accepted) => {
                self.fields = FormFields::default();
                Status::Success(SUCCESS_TEXT.to_string())
            }
            Ok(Outcome::Rejected(text)) => Status::Error(text),
            Err(e) => {
                warn!("Feedback submission failed: {}", e);
                Status::Error(NETWORK_ERROR_TEXT.to_string())
            }
        };

        &self.status
    }

    async fn send(&self, payload: &FormFields) -> Result<Outcome> {
        let response = self.client.post(&self.endpoint).json(payload).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let text = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| GENERIC_ERROR_TEXT.to_string());
            debug!("Server rejected feedback ({}): {}", status, text);
            return Ok(Outcome::Rejected(text));
        }

        serde_json::from_slice::<serde_json::Value>(&body)?;
        Ok(Outcome::Accepted)
    }
}
