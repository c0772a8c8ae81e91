//! # Cheevos HTTP API Module
//!
//! REST surface over one shared [`Engine`].
//!
//! ## Endpoints
//!
//! - `POST /progress` - Record progress on a block
//! - `GET /achievements` - Every threshold with progress
//! - `GET /status` - Counts and consistency
//! - `GET /save` - Raw save string
//! - `POST /flush` - Force a checked save
//! - `GET /health` - Health check
//!
//! Reads are open. Writes (`/progress`, `/flush`) go through the write
//! throttle and, when a key is configured, the key check.
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `CHEEVOS_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `CHEEVOS_RATE_LIMIT`: Writes per second (default: 100, 0 to disable)
//! - `CHEEVOS_API_KEY`: If set, writes require `Authorization: Bearer <key>`

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{API_KEY_ENV, WriteKey};
pub use middleware::{RATE_LIMIT_ENV, WriteLimiter, write_limiter, write_rate_from_env};
pub use types::{
    AchievementsResponse, FlushResponse, HealthResponse, ProgressRequest, ProgressResponse,
    RejectionResponse, SaveResponse, StatusResponse,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use cheevos_core::{CheevoError, Engine};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Environment variable holding the allowed CORS origins.
pub const CORS_ORIGINS_ENV: &str = "CHEEVOS_CORS_ORIGINS";

/// Request bodies are tiny; anything larger is rejected.
const MAX_BODY_BYTES: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The single engine; writers serialize on the lock.
    pub engine: Arc<RwLock<Engine>>,
}

impl AppState {
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from `CHEEVOS_CORS_ORIGINS`.
///
/// `*` allows everything, unset means localhost only, anything else is a
/// comma-separated origin list.
fn build_cors_layer() -> CorsLayer {
    match std::env::var(CORS_ORIGINS_ENV).ok().as_deref() {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins ({}=*)", CORS_ORIGINS_ENV);
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => build_localhost_cors(),
    }
}

fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:8437",
        "http://127.0.0.1:8437",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the router with all endpoints and middleware.
///
/// Layers, outer to inner: tracing, CORS, body limit; then on the write
/// routes only, throttle and key check.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let mut writes = Router::new()
        .route("/progress", post(handlers::progress_handler))
        .route("/flush", post(handlers::flush_handler));

    match WriteKey::from_env() {
        Some(key) => {
            tracing::info!("API key required for progress writes");
            writes = writes.layer(axum_middleware::from_fn_with_state(
                key,
                auth::require_write_key,
            ));
        }
        None => tracing::warn!(
            "Progress writes are open to anyone who can reach the server; set {} to require a key",
            API_KEY_ENV
        ),
    }

    let rate = write_rate_from_env();
    match write_limiter(rate) {
        Some(limiter) => {
            tracing::info!("Write throttling enabled: {} writes/second", rate);
            writes = writes.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::throttle_writes,
            ));
        }
        None => tracing::info!("Write throttling disabled"),
    }

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/achievements", get(handlers::achievements_handler))
        .route("/save", get(handlers::save_handler))
        .merge(writes)
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Serve until the process is stopped, then flush progress once more.
pub async fn run_server(addr: &str, engine: Engine) -> Result<(), CheevoError> {
    let state = AppState::new(engine);
    let router = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CheevoError::Storage(format!("Bind failed: {}", e)))?;

    tracing::info!("Cheevos HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CheevoError::Storage(format!("Server error: {}", e)))?;

    tracing::info!("Shutting down, flushing progress");
    state.engine.write().await.flush()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
