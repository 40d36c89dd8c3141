// ============================================================================
// Sessiond Core - Session Entity & Validity Evaluator
// File: crates/sessiond-core/src/domain/session.rs
// ============================================================================
//! Per-user session state and the pure validity decision.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single tracked session.
///
/// `timeout_hours` is snapshotted from the policy cache when the session is
/// touched. It is deliberately NOT re-read on validity checks, so entries
/// touched under different policy generations expire under the timeout that
/// applied to them.
#[derive(Debug, Clone, Serialize)]
pub struct SessionEntry {
    pub user_id: String,
    pub last_activity: DateTime<Utc>,
    pub timeout_hours: f64,
}

/// Outcome of a validity check, before the user id is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionValidity {
    pub valid: bool,
    pub message: String,
    /// Human-readable inactivity duration; set only when the session expired.
    pub inactive_time: Option<String>,
}

impl SessionValidity {
    /// True when the session existed but was found expired. The caller must
    /// evict the registry entry in that case.
    pub fn is_expired(&self) -> bool {
        !self.valid && self.inactive_time.is_some()
    }
}

/// Validity check result as returned to callers of the lifecycle service.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub user_id: String,
    pub valid: bool,
    pub message: String,
    pub inactive_time: Option<String>,
}

impl SessionStatus {
    pub fn from_validity(user_id: &str, validity: SessionValidity) -> Self {
        Self {
            user_id: user_id.to_string(),
            valid: validity.valid,
            message: validity.message,
            inactive_time: validity.inactive_time,
        }
    }
}

/// Decide whether a session is still valid at `now`.
///
/// Deterministic in `(entry, now)`; callers inject `now` so tests run without
/// a live clock. Expiry is computed on read, never stored.
pub fn check_validity(entry: Option<&SessionEntry>, now: DateTime<Utc>) -> SessionValidity {
    let Some(entry) = entry else {
        return SessionValidity {
            valid: false,
            message: "no active session".to_string(),
            inactive_time: None,
        };
    };

    let elapsed_hours = (now - entry.last_activity).num_milliseconds() as f64 / 3_600_000.0;

    if elapsed_hours > entry.timeout_hours {
        let formatted = format_inactive_duration(elapsed_hours);
        SessionValidity {
            valid: false,
            message: format!("inactive for {}; session expired", formatted),
            inactive_time: Some(formatted),
        }
    } else {
        SessionValidity {
            valid: true,
            message: "session is active".to_string(),
            inactive_time: None,
        }
    }
}

/// Format an elapsed duration as whole hours and the whole-minutes remainder.
pub fn format_inactive_duration(elapsed_hours: f64) -> String {
    let hours = elapsed_hours.floor() as i64;
    let minutes = ((elapsed_hours - hours as f64) * 60.0).floor() as i64;

    if hours > 0 {
        if minutes > 0 {
            format!("{} hour(s) and {} minute(s)", hours, minutes)
        } else {
            format!("{} hour(s)", hours)
        }
    } else {
        format!("{} minute(s)", minutes)
    }
}
