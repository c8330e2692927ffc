//! feedback-client: submission client for the site feedback form
//!
//! Holds the form fields, decides whether the send button is enabled, posts
//! the form to the feedback endpoint and turns the answer into one of four
//! mutually exclusive statuses: idle, sending, success or error.
//!
//! Nothing is retried automatically; after an error the visitor submits again.

pub mod error;
pub mod form;

pub use error::{ClientError, Result};
pub use form::{FeedbackForm, FormFields, Status};
