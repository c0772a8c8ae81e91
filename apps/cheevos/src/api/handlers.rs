//! # API Endpoint Handlers

use super::{
    AppState,
    types::{
        AchievementsResponse, FlushResponse, HealthResponse, ProgressRequest, ProgressResponse,
        SaveResponse, StatusResponse,
    },
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use cheevos_core::CheevoError;

/// HTTP status for an engine error.
fn status_for(err: &CheevoError) -> StatusCode {
    match err {
        CheevoError::InvalidArgument(_) | CheevoError::CorruptState(_) => StatusCode::BAD_REQUEST,
        CheevoError::Storage(_) | CheevoError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Counts and consistency.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.read().await;
    let summary = engine.summary();
    let consistency = engine.check_consistency();

    let response = StatusResponse {
        blocks: summary.blocks,
        thresholds: summary.thresholds,
        unlocked: summary.unlocked,
        persisted_slots: consistency.persisted_slots,
        consistent: consistency.is_consistent(),
        dirty: engine.is_dirty(),
    };

    (StatusCode::OK, Json(response))
}

// =============================================================================
// ACHIEVEMENTS HANDLER
// =============================================================================

/// List every threshold with progress.
pub async fn achievements_handler(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.read().await;
    Json(AchievementsResponse {
        achievements: engine.statuses(),
    })
}

// =============================================================================
// PROGRESS HANDLER
// =============================================================================

/// Record progress on a block.
pub async fn progress_handler(
    State(state): State<AppState>,
    Json(request): Json<ProgressRequest>,
) -> impl IntoResponse {
    let (block, delta) = request.resolve();

    let mut engine = state.engine.write().await;
    match engine.record_progress(block, delta) {
        Ok(outcome) => {
            let progress = engine.get(block);
            (
                StatusCode::OK,
                Json(ProgressResponse::success(
                    block,
                    progress,
                    outcome.events,
                    outcome.persist_warning,
                )),
            )
        }
        Err(e) => (status_for(&e), Json(ProgressResponse::error(&e))),
    }
}

// =============================================================================
// SAVE HANDLERS
// =============================================================================

/// Current save string.
pub async fn save_handler(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.read().await;
    Json(SaveResponse {
        save: engine.snapshot(),
        slots: engine.progress().len(),
    })
}

/// Force a checked save.
pub async fn flush_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut engine = state.engine.write().await;
    match engine.flush() {
        Ok(()) => (
            StatusCode::OK,
            Json(FlushResponse {
                success: true,
                error: None,
            }),
        ),
        Err(e) => (
            status_for(&e),
            Json(FlushResponse {
                success: false,
                error: Some(e.to_string()),
            }),
        ),
    }
}
