//! Mail relay: turning a submission into an email and handing it to SMTP
//!
//! - [`config`]: relay settings loaded from the environment
//! - [`smtp`]: the SMTP implementation of [`MailRelay`]

pub mod config;
pub mod smtp;

use async_trait::async_trait;

use crate::config::MailConfig;
use crate::error::Result;
use crate::submission::FeedbackSubmission;

pub use config::{ConfigSource, MailRelayConfig, TransportSecurity};
pub use smtp::SmtpRelay;

/// Shown in the body for fields the visitor left empty
const EMPTY_FIELD: &str = "—";

/// A composed plain-text feedback email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMail {
    pub sender_name: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub reply_to: Option<String>,
    pub body: String,
}

impl FeedbackMail {
    /// Compose the email for a validated submission
    pub fn compose(
        submission: &FeedbackSubmission,
        relay: &MailRelayConfig,
        mail: &MailConfig,
    ) -> Self {
        let reply_to = if submission.contact.is_empty() {
            None
        } else {
            Some(submission.contact.clone())
        };

        Self {
            sender_name: mail.sender_name.clone(),
            from: relay.sender.clone(),
            to: relay.recipient.clone(),
            subject: mail.subject.clone(),
            reply_to,
            body: compose_body(submission),
        }
    }
}

/// Render the message body
pub fn compose_body(submission: &FeedbackSubmission) -> String {
    let or_dash = |value: &str| {
        if value.is_empty() {
            EMPTY_FIELD.to_string()
        } else {
            value.to_string()
        }
    };

    [
        format!("Name: {}", or_dash(&submission.name)),
        format!("Contact: {}", or_dash(&submission.contact)),
        String::new(),
        "Message:".to_string(),
        submission.message.clone(),
    ]
    .join("\n")
}

/// Something that can deliver a composed feedback email
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailRelay: Send + Sync {
    /// Deliver one message. Errors carry full detail for the logs.
    async fn relay(&self, config: &MailRelayConfig, mail: &FeedbackMail) -> Result<()>;
}
