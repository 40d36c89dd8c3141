//! Application-wide constants

/// Timeout applied before the policy source has ever answered.
pub const DEFAULT_TIMEOUT_HOURS: f64 = 2.0;
/// Interval between timer-driven policy refreshes.
pub const DEFAULT_REFRESH_INTERVAL_HOURS: f64 = 2.0;
/// Cache age beyond which a touch triggers a lazy refresh.
pub const DEFAULT_POLICY_MAX_AGE_HOURS: f64 = 2.0;

pub const UNIT_HOURS: &str = "HR";
pub const UNIT_MINUTES: &str = "MIN";
