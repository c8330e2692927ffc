//! feedback-rs: feedback form endpoint with SMTP relay
//!
//! Receives feedback submitted from the site, validates it, drops obvious
//! bot traffic and forwards the rest as a plain-text email.
//!
//! # Pipeline
//!
//! 1. Parse the JSON body
//! 2. Validate it against the submission schema (400 on failure)
//! 3. Honeypot check: filled-in hidden field gets a fake success
//! 4. Load relay settings from the environment (500 when incomplete)
//! 5. Compose the email and relay it over SMTP under a deadline
//!
//! # Example
//!
//! ```no_run
//! use feedback_rs::{ApiServer, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let server = ApiServer::new(&config);
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`api`]: HTTP routes and handlers
//! - [`config`]: Configuration management
//! - [`error`]: Error types and their HTTP mapping
//! - [`relay`]: Email composition and SMTP delivery
//! - [`submission`]: Submission schema and validation

pub mod api;
pub mod config;
pub mod error;
pub mod relay;
pub mod submission;

// Re-export commonly used types
pub use api::ApiServer;
pub use config::Config;
pub use error::{FeedbackError, Result};
pub use submission::FeedbackSubmission;
