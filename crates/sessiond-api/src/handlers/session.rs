// ============================================================================
// Sessiond API - Session Handlers
// File: crates/sessiond-api/src/handlers/session.rs
// ============================================================================
//! Session HTTP handlers (touch, check, logout)

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use sessiond_core::domain::SessionStatus;

use crate::middleware::UserIdentity;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Session status payload returned by touch and check.
#[derive(Debug, Serialize)]
pub struct SessionStatusDto {
    pub user_id: String,
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive_time: Option<String>,
}

impl From<SessionStatus> for SessionStatusDto {
    fn from(status: SessionStatus) -> Self {
        Self {
            user_id: status.user_id,
            valid: status.valid,
            message: status.message,
            inactive_time: status.inactive_time,
        }
    }
}

/// Touch handler - POST /api/v1/session/touch
///
/// Records activity for the authenticated user and returns the resulting
/// session status. Touching never fails the request.
pub async fn touch(
    State(state): State<AppState>,
    user: UserIdentity,
) -> Json<ApiResponse<SessionStatusDto>> {
    state.sessions.touch_activity(&user.0).await;
    let status = state.sessions.check_session(&user.0);
    Json(ApiResponse::success(status.into()))
}

/// Check handler - GET /api/v1/session/check
///
/// An expired session maps to `LOGIN_TIMEOUT` carrying the inactive-time
/// message, distinguishable from `NO_SESSION` (never established or already
/// logged out).
pub async fn check(
    State(state): State<AppState>,
    user: UserIdentity,
) -> Result<Json<ApiResponse<SessionStatusDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let status = state.sessions.check_session(&user.0);

    if status.valid {
        return Ok(Json(ApiResponse::success(status.into())));
    }

    let code = if status.inactive_time.is_some() {
        "LOGIN_TIMEOUT"
    } else {
        "NO_SESSION"
    };
    Err((
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error(code, &status.message)),
    ))
}

/// Logout handler - POST /api/v1/session/logout
pub async fn logout(State(state): State<AppState>, user: UserIdentity) -> Json<ApiResponse<()>> {
    state.sessions.remove_session(&user.0);
    Json(ApiResponse::success(()))
}
