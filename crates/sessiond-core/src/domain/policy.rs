// ============================================================================
// Sessiond Core - Timeout Policy
// File: crates/sessiond-core/src/domain/policy.rs
// ============================================================================
//! The externally-sourced inactivity timeout and its cached form.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use sessiond_shared::constants::{UNIT_HOURS, UNIT_MINUTES};

/// Raw policy row as returned by the policy source: a value plus a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRecord {
    pub time_value: f64,
    pub unit: String,
}

impl PolicyRecord {
    /// Resolve the record into hours. `MIN` divides by 60, `HR` passes the
    /// value through; an unrecognized unit is applied as hours with a warning.
    pub fn resolve_hours(&self) -> f64 {
        match self.unit.as_str() {
            UNIT_HOURS => self.time_value,
            UNIT_MINUTES => self.time_value / 60.0,
            other => {
                warn!(
                    "Unrecognized timeout unit '{}', applying value {} as hours",
                    other, self.time_value
                );
                self.time_value
            }
        }
    }
}

/// Cached timeout state. Both fields are always read and written together.
#[derive(Debug, Clone)]
pub struct TimeoutPolicy {
    pub timeout_hours: f64,
    /// Timestamp of the last successful resolution; `None` until the policy
    /// source has answered at least once.
    pub last_update: Option<DateTime<Utc>>,
}

impl TimeoutPolicy {
    pub fn new(default_timeout_hours: f64) -> Self {
        Self {
            timeout_hours: default_timeout_hours,
            last_update: None,
        }
    }
}

/// Read-only view of the policy cache for introspection. The failure counter
/// and last error surface refresh problems that are otherwise only logged.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyConfig {
    pub timeout_hours: f64,
    pub last_update: Option<DateTime<Utc>>,
    pub auto_refresh_active: bool,
    pub refresh_failures: u64,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_divide_by_sixty() {
        let record = PolicyRecord {
            time_value: 90.0,
            unit: "MIN".to_string(),
        };
        assert_eq!(record.resolve_hours(), 1.5);
    }

    #[test]
    fn hours_pass_through() {
        let record = PolicyRecord {
            time_value: 3.0,
            unit: "HR".to_string(),
        };
        assert_eq!(record.resolve_hours(), 3.0);
    }

    #[test]
    fn unknown_unit_is_applied_as_hours() {
        let record = PolicyRecord {
            time_value: 5.0,
            unit: "XYZ".to_string(),
        };
        assert_eq!(record.resolve_hours(), 5.0);
    }

    #[test]
    fn fresh_policy_starts_unresolved() {
        let policy = TimeoutPolicy::new(2.0);
        assert_eq!(policy.timeout_hours, 2.0);
        assert!(policy.last_update.is_none());
    }
}
