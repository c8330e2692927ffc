use feedback_rs::api::{ApiServer, AppState};
use feedback_rs::config::{MailConfig, ServerConfig};
use feedback_rs::relay::config::{
    ENV_FROM, ENV_HOST, ENV_PASS, ENV_PORT, ENV_RECEIVER, ENV_USER,
};
use feedback_rs::relay::{ConfigSource, SmtpRelay};
use std::sync::{Arc, Once};
use std::time::Duration;
use tokio::net::TcpListener;

use super::fake_smtp::{Behavior, FakeSmtpServer};

pub const SENDER: &str = "hello@example.com";
pub const RECIPIENT: &str = "inbox@example.com";
pub const RELAY_USER: &str = "relay@example.com";

/// Test environment: fake relay plus a running feedback server
pub struct TestEnv {
    pub smtp: FakeSmtpServer,
    /// URL of the feedback endpoint
    pub endpoint: String,
}

impl TestEnv {
    /// Start a fake relay with the given behavior and a server pointing at it
    pub async fn start(behavior: Behavior) -> Self {
        Self::start_with(behavior, 10, relay_env).await
    }

    /// Start with a custom relay timeout and environment
    pub async fn start_with<F>(behavior: Behavior, timeout_seconds: u64, env: F) -> Self
    where
        F: FnOnce(u16) -> ConfigSource,
    {
        setup_logging();

        let smtp = FakeSmtpServer::start(behavior).await;
        let state = AppState {
            relay: Arc::new(SmtpRelay::new(Duration::from_secs(timeout_seconds))),
            env: env(smtp.port()),
            mail: MailConfig::default(),
        };
        let server = ApiServer::with_state(ServerConfig::default(), state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind feedback server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Err(e) = server.serve(listener).await {
                eprintln!("Feedback server error: {}", e);
            }
        });

        Self {
            smtp,
            endpoint: format!("http://{}/api/feedback", addr),
        }
    }

    /// POST a raw JSON value, bypassing the client's local checks
    pub async fn post_raw(&self, body: &serde_json::Value) -> (u16, serde_json::Value) {
        let response = reqwest::Client::new()
            .post(&self.endpoint)
            .json(body)
            .send()
            .await
            .expect("Request failed");

        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(serde_json::Value::Null);
        (status, body)
    }
}

/// Complete relay environment for a fake relay on localhost
pub fn relay_env(port: u16) -> ConfigSource {
    ConfigSource::fixed([
        (ENV_HOST, "127.0.0.1".to_string()),
        (ENV_PORT, port.to_string()),
        (ENV_USER, RELAY_USER.to_string()),
        (ENV_PASS, "secret".to_string()),
        (ENV_RECEIVER, RECIPIENT.to_string()),
        (ENV_FROM, SENDER.to_string()),
    ])
}

/// Route server logs to the test output once per binary
pub fn setup_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("feedback_rs=debug")
            .with_test_writer()
            .try_init();
    });
}
