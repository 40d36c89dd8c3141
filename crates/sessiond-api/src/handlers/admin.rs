// ============================================================================
// Sessiond API - Admin Handlers
// File: crates/sessiond-api/src/handlers/admin.rs
// ============================================================================
//! Administrative handlers: session enumeration, cleanup, policy config.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use sessiond_core::domain::{PolicyConfig, SessionEntry};

use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ActiveSessionDto {
    pub user_id: String,
    pub last_activity: DateTime<Utc>,
    pub timeout_hours: f64,
}

impl From<SessionEntry> for ActiveSessionDto {
    fn from(entry: SessionEntry) -> Self {
        Self {
            user_id: entry.user_id,
            last_activity: entry.last_activity,
            timeout_hours: entry.timeout_hours,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub removed: usize,
}

#[derive(Debug, Serialize)]
pub struct PolicyConfigDto {
    pub timeout_hours: f64,
    pub last_update: Option<DateTime<Utc>>,
    pub auto_refresh_active: bool,
    pub refresh_failures: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl From<PolicyConfig> for PolicyConfigDto {
    fn from(config: PolicyConfig) -> Self {
        Self {
            timeout_hours: config.timeout_hours,
            last_update: config.last_update,
            auto_refresh_active: config.auto_refresh_active,
            refresh_failures: config.refresh_failures,
            last_error: config.last_error,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminLogoutRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
}

/// List sessions handler - GET /api/v1/admin/sessions
///
/// Debug view over the raw registry; entries past their timeout remain
/// listed until a validity check evicts them.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<ActiveSessionDto>>> {
    let sessions = state
        .sessions
        .list_active_sessions()
        .into_iter()
        .map(ActiveSessionDto::from)
        .collect();
    Json(ApiResponse::success(sessions))
}

/// Cleanup handler - POST /api/v1/admin/sessions/cleanup
pub async fn cleanup_sessions(State(state): State<AppState>) -> Json<ApiResponse<CleanupResponse>> {
    let removed = state.sessions.cleanup_expired_sessions();
    Json(ApiResponse::success(CleanupResponse { removed }))
}

/// Admin logout handler - POST /api/v1/admin/sessions/logout
pub async fn logout_user(
    State(state): State<AppState>,
    Json(payload): Json<AdminLogoutRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    if payload.validate().is_err() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("VALIDATION_ERROR", "user_id is required")),
        ));
    }

    state.sessions.remove_session(&payload.user_id);
    Ok(Json(ApiResponse::success(())))
}

/// Config handler - GET /api/v1/admin/session-config
pub async fn get_session_config(State(state): State<AppState>) -> Json<ApiResponse<PolicyConfigDto>> {
    Json(ApiResponse::success(state.sessions.config().into()))
}

/// Force refresh handler - POST /api/v1/admin/session-config/refresh
pub async fn refresh_session_config(
    State(state): State<AppState>,
) -> Json<ApiResponse<PolicyConfigDto>> {
    let config = state.sessions.force_refresh_config().await;
    Json(ApiResponse::success(config.into()))
}
