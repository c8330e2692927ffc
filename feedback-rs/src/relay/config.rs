//! Mail relay configuration, read from the environment on each request

use std::collections::HashMap;
use std::fmt;

use crate::error::{FeedbackError, Result};

pub const ENV_HOST: &str = "EMAIL_HOST";
pub const ENV_PORT: &str = "EMAIL_PORT";
pub const ENV_USER: &str = "EMAIL_USER";
pub const ENV_PASS: &str = "EMAIL_PASS";
pub const ENV_RECEIVER: &str = "FEEDBACK_RECEIVER_EMAIL";
pub const ENV_TO: &str = "EMAIL_TO";
pub const ENV_FROM: &str = "EMAIL_FROM";
pub const ENV_SECURE: &str = "EMAIL_SECURE";

/// Implicit TLS port (SMTPS)
pub const SMTPS_PORT: u16 = 465;
/// Message submission port, STARTTLS expected
pub const SUBMISSION_PORT: u16 = 587;

/// Where relay settings are looked up
#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    /// The process environment
    #[default]
    Process,
    /// A fixed set of values
    Fixed(HashMap<String, String>),
}

impl ConfigSource {
    pub fn fixed<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ConfigSource::Fixed(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up a variable. Empty values count as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match self {
            ConfigSource::Process => std::env::var(key).ok(),
            ConfigSource::Fixed(vars) => vars.get(key).cloned(),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// How the SMTP connection is protected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportSecurity {
    /// TLS from the first byte
    Implicit,
    /// Plain connect, STARTTLS mandatory before any credentials
    StartTls,
    /// STARTTLS when the server offers it
    Opportunistic,
}

/// Everything needed to hand one message to the SMTP relay
#[derive(Clone, PartialEq, Eq)]
pub struct MailRelayConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
    pub recipient: String,
    /// Explicit request for implicit TLS
    pub secure: bool,
}

impl fmt::Debug for MailRelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailRelayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .field("secure", &self.secure)
            .finish()
    }
}

impl MailRelayConfig {
    /// Load relay settings, failing if any required value is absent
    pub fn load(source: &ConfigSource) -> Result<Self> {
        let host = source.get(ENV_HOST);
        let username = source.get(ENV_USER);
        let password = source.get(ENV_PASS);
        let recipient = source.get(ENV_RECEIVER).or_else(|| source.get(ENV_TO));
        let sender = source.get(ENV_FROM).or_else(|| username.clone());

        let port = match source.get(ENV_PORT) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                FeedbackError::Config(format!("{} is not a valid port: {}", ENV_PORT, raw))
            })?,
            None => SUBMISSION_PORT,
        };

        let secure = parse_flag(source.get(ENV_SECURE).as_deref());

        match (host, username, password, recipient, sender) {
            (Some(host), Some(username), Some(password), Some(recipient), Some(sender)) => {
                Ok(Self {
                    host,
                    port,
                    username,
                    password,
                    sender,
                    recipient,
                    secure,
                })
            }
            (host, username, password, recipient, sender) => {
                let missing: Vec<&str> = [
                    (host.is_none(), ENV_HOST),
                    (username.is_none(), ENV_USER),
                    (password.is_none(), ENV_PASS),
                    (recipient.is_none(), ENV_RECEIVER),
                    (sender.is_none(), ENV_FROM),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();

                Err(FeedbackError::Config(format!(
                    "missing {}",
                    missing.join(", ")
                )))
            }
        }
    }

    /// Pick the transport security mode for this configuration.
    ///
    /// Port 465 always means implicit TLS. Otherwise the explicit flag wins,
    /// and the submission port requires a STARTTLS upgrade.
    pub fn security(&self) -> TransportSecurity {
        if self.port == SMTPS_PORT || self.secure {
            TransportSecurity::Implicit
        } else if self.port == SUBMISSION_PORT {
            TransportSecurity::StartTls
        } else {
            TransportSecurity::Opportunistic
        }
    }
}

/// Parse a boolean flag the way the deployment scripts write them
fn parse_flag(value: Option<&str>) -> bool {
    match value {
        Some(v) => {
            let v = v.trim().to_ascii_lowercase();
            v == "1" || v == "true" || v == "yes"
        }
        None => false,
    }
}
