//! SMTP relay for outgoing feedback mail
//!
//! A transport is built for every message from the [`MailRelayConfig`] of
//! that request, so configuration changes apply without a restart.
//!
//! # Security
//! - Implicit TLS on port 465, STARTTLS required on 587
//! - TLS 1.2+ only
//! - Every send runs under a deadline

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters, TlsVersion},
    },
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{FeedbackMail, MailRelay, MailRelayConfig, TransportSecurity};
use crate::error::{FeedbackError, Result};

/// Lowest TLS version accepted on any encrypted connection
pub const MIN_TLS_VERSION: TlsVersion = TlsVersion::Tlsv12;

/// Relays feedback mail through an authenticated SMTP server
///
/// # Examples
/// ```no_run
/// use feedback_rs::relay::{ConfigSource, MailRelay, MailRelayConfig, SmtpRelay};
/// use std::time::Duration;
///
/// # async fn example(mail: feedback_rs::relay::FeedbackMail) -> Result<(), Box<dyn std::error::Error>> {
/// let config = MailRelayConfig::load(&ConfigSource::Process)?;
/// let relay = SmtpRelay::new(Duration::from_secs(30));
/// relay.relay(&config, &mail).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SmtpRelay {
    timeout: Duration,
}

impl SmtpRelay {
    /// Create a relay whose sends fail after `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the TLS mode for a configuration
    pub fn tls_for(config: &MailRelayConfig) -> Result<Tls> {
        let parameters = TlsParameters::builder(config.host.clone())
            .set_min_tls_version(MIN_TLS_VERSION)
            .build()
            .map_err(|e| FeedbackError::Relay(format!("Failed to build TLS parameters: {}", e)))?;

        Ok(match config.security() {
            TransportSecurity::Implicit => Tls::Wrapper(parameters),
            TransportSecurity::StartTls => Tls::Required(parameters),
            TransportSecurity::Opportunistic => Tls::Opportunistic(parameters),
        })
    }

    fn transport(&self, config: &MailRelayConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let tls = Self::tls_for(config)?;

        debug!(
            "Connecting to {}:{} using {:?}",
            config.host,
            config.port,
            config.security()
        );

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
                .port(config.port)
                .tls(tls)
                .credentials(Credentials::new(
                    config.username.clone(),
                    config.password.clone(),
                ))
                .timeout(Some(self.timeout))
                .build(),
        )
    }

    /// Build the RFC 5322 message
    pub fn build_message(mail: &FeedbackMail) -> Result<Message> {
        let from_address: Address = mail.from.parse().map_err(|e| {
            FeedbackError::Config(format!("Invalid sender address '{}': {}", mail.from, e))
        })?;
        let to: Mailbox = mail.to.parse().map_err(|e| {
            FeedbackError::Config(format!("Invalid recipient address '{}': {}", mail.to, e))
        })?;

        let mut builder = Message::builder()
            .from(Mailbox::new(Some(mail.sender_name.clone()), from_address))
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN);

        if let Some(reply_to) = mail.reply_to.as_deref() {
            // Contact may be a chat handle rather than an address
            match reply_to.parse::<Mailbox>() {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(e) => debug!("Contact '{}' is not an address, no Reply-To: {}", reply_to, e),
            }
        }

        builder
            .body(mail.body.clone())
            .map_err(|e| FeedbackError::Relay(format!("Failed to build message: {}", e)))
    }
}

#[async_trait]
impl MailRelay for SmtpRelay {
    async fn relay(&self, config: &MailRelayConfig, mail: &FeedbackMail) -> Result<()> {
        let message = Self::build_message(mail)?;
        let transport = self.transport(config)?;

        info!(
            "Relaying feedback to {} via {}:{}",
            mail.to, config.host, config.port
        );

        match timeout(self.timeout, transport.send(message)).await {
            Ok(Ok(response)) => {
                info!("Relay accepted message ({})", response.code());
                Ok(())
            }
            Ok(Err(e)) => Err(FeedbackError::Relay(e.to_string())),
            Err(_) => {
                warn!("Relay {}:{} did not answer in time", config.host, config.port);
                Err(FeedbackError::Timeout(self.timeout))
            }
        }
    }
}
