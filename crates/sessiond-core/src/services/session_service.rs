// ============================================================================
// Sessiond Core - Session Lifecycle Service
// File: crates/sessiond-core/src/services/session_service.rs
// ============================================================================
//! Session lifecycle facade: activity touch, validity check, logout,
//! enumeration, cleanup, policy introspection, shutdown.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::{check_validity, PolicyConfig, SessionEntry, SessionStatus};
use crate::repositories::PolicyRepository;
use crate::services::{PolicyCache, SessionRegistry};

/// Coordinates the session registry and the timeout policy cache.
///
/// Constructed explicitly and injected where needed; there is no process-wide
/// singleton. Sessions are memory-resident and lost on restart by design.
pub struct SessionService<R: PolicyRepository + 'static> {
    registry: SessionRegistry,
    policy: PolicyCache<R>,
}

impl<R: PolicyRepository + 'static> SessionService<R> {
    pub fn new(
        repo: Arc<R>,
        default_timeout_hours: f64,
        refresh_interval_hours: f64,
        policy_max_age_hours: f64,
    ) -> Self {
        Self {
            registry: SessionRegistry::new(),
            policy: PolicyCache::new(
                repo,
                default_timeout_hours,
                refresh_interval_hours,
                policy_max_age_hours,
            ),
        }
    }

    /// Record user activity now.
    ///
    /// Refreshes the policy first when it is stale, so the entry never
    /// snapshots a timeout older than the refresh it triggered. Never fails
    /// the caller's flow; an empty identity cannot establish a session and is
    /// only logged.
    pub async fn touch_activity(&self, user_id: &str) {
        if user_id.is_empty() {
            warn!("touch_activity called without a user identity, ignoring");
            return;
        }

        self.policy.refresh_if_stale().await;

        let entry = SessionEntry {
            user_id: user_id.to_string(),
            last_activity: Utc::now(),
            timeout_hours: self.policy.timeout_hours(),
        };
        self.registry.put(entry);
        debug!("Activity recorded for '{}'", user_id);
    }

    /// Check session validity. An entry found expired is evicted as a side
    /// effect of this check.
    pub fn check_session(&self, user_id: &str) -> SessionStatus {
        let entry = self.registry.get(user_id);
        let verdict = check_validity(entry.as_ref(), Utc::now());

        if verdict.is_expired() {
            self.registry.delete(user_id);
            info!("Session for '{}' evicted: {}", user_id, verdict.message);
        }

        SessionStatus::from_validity(user_id, verdict)
    }

    /// Explicit logout; idempotent.
    pub fn remove_session(&self, user_id: &str) {
        self.registry.delete(user_id);
        info!("Session for '{}' removed", user_id);
    }

    /// Raw registry snapshot for admin/debug use. No expiry filtering: a
    /// stale entry stays visible here until an actual validity check evicts
    /// it.
    pub fn list_active_sessions(&self) -> Vec<SessionEntry> {
        self.registry.entries()
    }

    /// Run a validity check over every registered session and return how many
    /// were found invalid (and therefore evicted) during this pass.
    pub fn cleanup_expired_sessions(&self) -> usize {
        let mut removed = 0;
        for user_id in self.registry.user_ids() {
            if !self.check_session(&user_id).valid {
                removed += 1;
            }
        }
        info!("Expired session cleanup removed {} session(s)", removed);
        removed
    }

    pub fn config(&self) -> PolicyConfig {
        self.policy.snapshot()
    }

    /// Unconditional policy refresh, bypassing the staleness check.
    pub async fn force_refresh_config(&self) -> PolicyConfig {
        self.policy.refresh_policy().await;
        self.policy.snapshot()
    }

    pub fn start_auto_refresh(&self) {
        self.policy.start_auto_refresh();
    }

    /// Stop the refresh timer and drop all tracked sessions. Safe to call
    /// more than once.
    pub fn shutdown(&self) {
        self.policy.stop_auto_refresh();
        self.registry.clear();
        info!("Session service shut down");
    }
}
