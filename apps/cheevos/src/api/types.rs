//! # API Request/Response Types
//!
//! JSON bodies for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cheevos_core::{
    AchievementStatus, BlockIndex, CheevoError, UnlockEvent, primitives::DEFAULT_DELTA,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Counts and the catalog/save consistency check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub blocks: usize,
    pub thresholds: usize,
    pub unlocked: usize,
    pub persisted_slots: usize,
    pub consistent: bool,
    pub dirty: bool,
}

// =============================================================================
// ACHIEVEMENTS RESPONSE
// =============================================================================

/// Every threshold with its current progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementsResponse {
    pub achievements: Vec<AchievementStatus>,
}

// =============================================================================
// PROGRESS REQUEST/RESPONSE
// =============================================================================

/// Progress report from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRequest {
    pub block: usize,
    /// Amount to add; defaults to 1.
    #[serde(default)]
    pub delta: Option<i64>,
}

impl ProgressRequest {
    /// Target block and the delta to apply.
    #[must_use]
    pub fn resolve(&self) -> (BlockIndex, i64) {
        (BlockIndex(self.block), self.delta.unwrap_or(DEFAULT_DELTA))
    }
}

/// Result of a progress report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u64>,
    #[serde(default)]
    pub unlocked: Vec<UnlockEvent>,
    /// Set when the counter moved but the save failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressResponse {
    /// Create a success response.
    #[must_use]
    pub fn success(
        block: BlockIndex,
        progress: u64,
        unlocked: Vec<UnlockEvent>,
        warning: Option<String>,
    ) -> Self {
        Self {
            success: true,
            block: Some(block.value()),
            progress: Some(progress),
            unlocked,
            warning,
            error: None,
        }
    }

    /// Create an error response.
    #[must_use]
    pub fn error(err: &CheevoError) -> Self {
        Self {
            success: false,
            block: None,
            progress: None,
            unlocked: Vec::new(),
            warning: None,
            error: Some(err.to_string()),
        }
    }
}

// =============================================================================
// SAVE / FLUSH RESPONSES
// =============================================================================

/// The raw persisted representation of the current progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub save: String,
    pub slots: usize,
}

/// Result of a forced save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlushResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// REJECTION RESPONSE
// =============================================================================

/// Body returned when a write is refused before reaching the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionResponse {
    pub success: bool,
    pub error: String,
}

impl RejectionResponse {
    /// Build the full response for `status`.
    pub fn respond(status: StatusCode, error: &str) -> Response {
        let body = Self {
            success: false,
            error: error.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
