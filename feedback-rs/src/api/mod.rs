//! REST API module for feedback-rs
//!
//! Provides the HTTP endpoint that receives feedback submissions

pub mod handlers;
pub mod server;

pub use handlers::AppState;
pub use server::ApiServer;
