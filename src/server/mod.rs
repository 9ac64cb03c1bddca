use crate::config::Config;
use crate::conversion::ConversionHandler;
use crate::history::HistoryTracker;
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod routes_api;
pub mod routes_ui;

pub use error::ApiError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Converter with the configured extraction backend
    pub handler: Arc<ConversionHandler>,
    /// Recently converted files, shared with the UI
    pub history: Arc<HistoryTracker>,
}

impl AppContext {
    pub fn new(config: Config, handler: ConversionHandler) -> Self {
        let history = HistoryTracker::with_capacity(config.history.capacity);
        Self {
            config: Arc::new(config),
            handler: Arc::new(handler),
            history: Arc::new(history),
        }
    }

    /// Build the context, including the extractor, from configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let handler = ConversionHandler::from_config(&config)
            .context("Failed to set up the conversion backend")?;
        Ok(Self::new(config, handler))
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([
            header::CONTENT_DISPOSITION,
            header::HeaderName::from_static(routes_api::BITRATE_HEADER),
            header::HeaderName::from_static(routes_api::SAVED_TO_HEADER),
        ]);

    let body_limit = ctx.config.server.max_upload_bytes();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Upload page
        .merge(routes_ui::ui_routes())
        // API routes
        .nest("/api", routes_api::api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext::from_config(config)?;
    tracing::info!(
        "Using {} backend, keeping {} history entries",
        ctx.handler.backend_name(),
        ctx.history.capacity()
    );

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
