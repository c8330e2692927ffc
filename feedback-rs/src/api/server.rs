//! API Server - HTTP server for the feedback endpoint

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

use crate::api::handlers::{self, AppState};
use crate::config::{Config, ServerConfig};
use crate::error::Result;
use crate::relay::{ConfigSource, SmtpRelay};

/// API Server
pub struct ApiServer {
    state: Arc<AppState>,
    config: ServerConfig,
}

impl ApiServer {
    /// Create the production server: SMTP relay, settings from the process environment
    pub fn new(config: &Config) -> Self {
        let relay = SmtpRelay::new(Duration::from_secs(config.relay.timeout_seconds));

        Self::with_state(
            config.server.clone(),
            AppState {
                relay: Arc::new(relay),
                env: ConfigSource::Process,
                mail: config.mail.clone(),
            },
        )
    }

    /// Create a server around prepared state
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        Self {
            state: Arc::new(state),
            config,
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        // The page may be served from another origin during development
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE]);

        let api_routes = Router::new()
            .route("/feedback", post(handlers::submit_feedback))
            .route("/health", get(handlers::health))
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes));

        let mut router = Router::new().nest("/api", api_routes);

        if let Some(dir) = &self.config.static_dir {
            info!("Serving site from {}", dir);
            let index = Path::new(dir).join("index.html");
            router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
        }

        router
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.listen_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        info!("Starting API server on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the task is dropped
        std::future::pending::<()>().await;
    }
}
