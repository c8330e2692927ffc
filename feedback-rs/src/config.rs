//! Configuration for feedback-rs
//!
//! Server settings come from a TOML file. SMTP credentials do not: they are
//! read from the environment on every request, see [`crate::relay::MailRelayConfig`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FeedbackError, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:3000")
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Directory with the pre-built site, served for every non-API path
    pub static_dir: Option<String>,
}

/// Relay behaviour that is not secret
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    /// Deadline for one complete SMTP transaction
    #[serde(default = "default_relay_timeout")]
    pub timeout_seconds: u64,
}

/// Outgoing message settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Display name put in front of the sender address
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// One of "pretty", "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_relay_timeout() -> u64 {
    30
}

fn default_subject() -> String {
    "NDGG — New feedback".to_string()
}

fn default_sender_name() -> String {
    "NDGG".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            max_body_bytes: default_max_body_bytes(),
            static_dir: None,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_relay_timeout(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            subject: default_subject(),
            sender_name: default_sender_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FeedbackError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| FeedbackError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server
            .listen_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|e| {
                FeedbackError::Config(format!(
                    "Invalid listen address '{}': {}",
                    self.server.listen_addr, e
                ))
            })?;

        if self.relay.timeout_seconds == 0 {
            return Err(FeedbackError::Config(
                "relay.timeout_seconds must be greater than zero".to_string(),
            ));
        }

        if self.mail.subject.trim().is_empty() {
            return Err(FeedbackError::Config("mail.subject is empty".to_string()));
        }

        Ok(())
    }
}
