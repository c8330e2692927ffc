//! feedback-rs: feedback endpoint server
//!
//! Usage: `feedback-rs [config.toml]`. Without an argument `feedback.toml`
//! in the working directory is used when present, else built-in defaults.

use feedback_rs::config::LoggingConfig;
use feedback_rs::{ApiServer, Config};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG_PATH: &str = "feedback.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| Path::new(DEFAULT_CONFIG_PATH).exists().then(|| DEFAULT_CONFIG_PATH.to_string()));

    let config = match &config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    init_logging(&config.logging);

    info!("Starting feedback-rs v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Configuration loaded from {}", path),
        None => info!("No config file found, using defaults"),
    }
    info!("  Listening on: {}", config.server.listen_addr);
    info!("  Relay timeout: {}s", config.relay.timeout_seconds);

    let server = ApiServer::new(&config);
    server.run().await?;

    Ok(())
}

/// Initialize logging; `RUST_LOG` overrides the configured level
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "feedback_rs={level},tower_http={level}",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    match logging.format.as_str() {
        "json" => registry.with(fmt::layer().json()).init(),
        "compact" => registry.with(fmt::layer().compact()).init(),
        _ => registry.with(fmt::layer().pretty()).init(),
    }
}
