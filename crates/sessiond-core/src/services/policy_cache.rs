// ============================================================================
// Sessiond Core - Timeout Policy Cache
// File: crates/sessiond-core/src/services/policy_cache.rs
// ============================================================================
//! Cached inactivity timeout, refreshed from the policy source on a timer
//! and lazily when stale.
//!
//! Refresh failures are absorbed here: the last good value stays in place,
//! the failure is logged and counted, and nothing propagates to callers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::domain::{PolicyConfig, TimeoutPolicy};
use crate::repositories::PolicyRepository;

pub struct PolicyCache<R: PolicyRepository + 'static> {
    repo: Arc<R>,
    policy: Arc<RwLock<TimeoutPolicy>>,
    refresh_failures: Arc<AtomicU64>,
    last_error: Arc<RwLock<Option<String>>>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
    refresh_interval_hours: f64,
    policy_max_age_hours: f64,
}

impl<R: PolicyRepository + 'static> PolicyCache<R> {
    pub fn new(
        repo: Arc<R>,
        default_timeout_hours: f64,
        refresh_interval_hours: f64,
        policy_max_age_hours: f64,
    ) -> Self {
        Self {
            repo,
            policy: Arc::new(RwLock::new(TimeoutPolicy::new(default_timeout_hours))),
            refresh_failures: Arc::new(AtomicU64::new(0)),
            last_error: Arc::new(RwLock::new(None)),
            refresh_task: Mutex::new(None),
            refresh_interval_hours,
            policy_max_age_hours,
        }
    }

    /// Query the policy source and update the cached timeout.
    ///
    /// Fire-and-forget from the caller's perspective: an empty result or a
    /// failed query leaves the prior state untouched.
    pub async fn refresh_policy(&self) {
        Self::run_refresh(
            &self.repo,
            &self.policy,
            &self.refresh_failures,
            &self.last_error,
        )
        .await;
    }

    /// Refresh only when the cache has never resolved or is older than the
    /// staleness threshold. Awaits completion before returning, so a caller
    /// that triggered the refresh observes its result.
    pub async fn refresh_if_stale(&self) {
        let stale = {
            let guard = self.policy.read().unwrap();
            match guard.last_update {
                None => true,
                Some(ts) => {
                    (Utc::now() - ts).num_milliseconds() as f64 / 3_600_000.0
                        > self.policy_max_age_hours
                }
            }
        };
        if stale {
            self.refresh_policy().await;
        }
    }

    /// Start the timer-driven refresh. Idempotent: a prior task is replaced,
    /// never stacked. The first tick fires immediately so a fresh process
    /// resolves the policy without waiting a full interval.
    pub fn start_auto_refresh(&self) {
        let mut slot = self.refresh_task.lock().unwrap();
        if let Some(task) = slot.take() {
            task.abort();
        }

        let repo = Arc::clone(&self.repo);
        let policy = Arc::clone(&self.policy);
        let refresh_failures = Arc::clone(&self.refresh_failures);
        let last_error = Arc::clone(&self.last_error);
        let interval = Duration::from_secs_f64(self.refresh_interval_hours * 3600.0);

        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                Self::run_refresh(&repo, &policy, &refresh_failures, &last_error).await;
            }
        }));

        info!(
            "Timeout policy auto refresh started (every {} hour(s))",
            self.refresh_interval_hours
        );
    }

    /// Cancel the timer-driven refresh. Safe to call repeatedly; no callback
    /// fires after this returns.
    pub fn stop_auto_refresh(&self) {
        if let Some(task) = self.refresh_task.lock().unwrap().take() {
            task.abort();
            info!("Timeout policy auto refresh stopped");
        }
    }

    /// Currently applicable timeout in hours.
    pub fn timeout_hours(&self) -> f64 {
        self.policy.read().unwrap().timeout_hours
    }

    /// Read-only snapshot of the cache state.
    pub fn snapshot(&self) -> PolicyConfig {
        let guard = self.policy.read().unwrap();
        PolicyConfig {
            timeout_hours: guard.timeout_hours,
            last_update: guard.last_update,
            auto_refresh_active: self.auto_refresh_active(),
            refresh_failures: self.refresh_failures.load(Ordering::Relaxed),
            last_error: self.last_error.read().unwrap().clone(),
        }
    }

    fn auto_refresh_active(&self) -> bool {
        self.refresh_task
            .lock()
            .unwrap()
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    async fn run_refresh(
        repo: &R,
        policy: &RwLock<TimeoutPolicy>,
        refresh_failures: &AtomicU64,
        last_error: &RwLock<Option<String>>,
    ) {
        match repo.fetch_timeout_policy().await {
            Ok(Some(record)) => {
                let hours = record.resolve_hours();
                // timeout and last_update change together, under one lock
                let mut guard = policy.write().unwrap();
                guard.timeout_hours = hours;
                guard.last_update = Some(Utc::now());
                drop(guard);
                info!("Session timeout policy refreshed: {} hour(s)", hours);
            }
            Ok(None) => {
                warn!("Timeout policy query returned no rows, keeping previous value");
            }
            Err(e) => {
                refresh_failures.fetch_add(1, Ordering::Relaxed);
                *last_error.write().unwrap() = Some(e.to_string());
                error!("Timeout policy refresh failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PolicyRecord;
    use crate::error::DomainError;
    use crate::repositories::MockPolicyRepository;
    use chrono::Duration as ChronoDuration;
    use std::sync::atomic::AtomicUsize;

    fn cache_with(repo: MockPolicyRepository) -> PolicyCache<MockPolicyRepository> {
        PolicyCache::new(Arc::new(repo), 2.0, 2.0, 2.0)
    }

    fn record(time_value: f64, unit: &str) -> PolicyRecord {
        PolicyRecord {
            time_value,
            unit: unit.to_string(),
        }
    }

    #[tokio::test]
    async fn refresh_resolves_minutes_and_stamps_last_update() {
        let mut repo = MockPolicyRepository::new();
        repo.expect_fetch_timeout_policy()
            .returning(|| Ok(Some(record(90.0, "MIN"))));
        let cache = cache_with(repo);

        cache.refresh_policy().await;

        let config = cache.snapshot();
        assert_eq!(config.timeout_hours, 1.5);
        assert!(config.last_update.is_some());
        assert_eq!(config.refresh_failures, 0);
        assert_eq!(config.last_error, None);
    }

    #[tokio::test]
    async fn empty_result_keeps_previous_state() {
        let mut repo = MockPolicyRepository::new();
        repo.expect_fetch_timeout_policy().returning(|| Ok(None));
        let cache = cache_with(repo);

        cache.refresh_policy().await;

        let config = cache.snapshot();
        assert_eq!(config.timeout_hours, 2.0);
        assert!(config.last_update.is_none());
        assert_eq!(config.refresh_failures, 0);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_value_and_counts() {
        let mut repo = MockPolicyRepository::new();
        let mut first = true;
        repo.expect_fetch_timeout_policy().returning(move || {
            if first {
                first = false;
                Ok(Some(record(3.0, "HR")))
            } else {
                Err(DomainError::DatabaseError("connection refused".to_string()))
            }
        });
        let cache = cache_with(repo);

        cache.refresh_policy().await;
        let before = cache.snapshot();
        cache.refresh_policy().await;
        let after = cache.snapshot();

        assert_eq!(after.timeout_hours, 3.0);
        assert_eq!(after.last_update, before.last_update);
        assert_eq!(after.refresh_failures, 1);
        assert!(after.last_error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn refresh_if_stale_triggers_before_first_resolution() {
        let mut repo = MockPolicyRepository::new();
        repo.expect_fetch_timeout_policy()
            .times(1)
            .returning(|| Ok(Some(record(3.0, "HR"))));
        let cache = cache_with(repo);

        cache.refresh_if_stale().await;
        assert_eq!(cache.timeout_hours(), 3.0);

        // freshly resolved -> a second call must not hit the source again
        cache.refresh_if_stale().await;
    }

    #[tokio::test]
    async fn refresh_if_stale_triggers_past_max_age() {
        let mut repo = MockPolicyRepository::new();
        repo.expect_fetch_timeout_policy()
            .times(1)
            .returning(|| Ok(Some(record(3.0, "HR"))));
        let cache = cache_with(repo);

        *cache.policy.write().unwrap() = TimeoutPolicy {
            timeout_hours: 2.0,
            last_update: Some(Utc::now() - ChronoDuration::hours(5)),
        };

        cache.refresh_if_stale().await;
        assert_eq!(cache.timeout_hours(), 3.0);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_refresh_fires_on_interval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_mock = Arc::clone(&calls);
        let mut repo = MockPolicyRepository::new();
        repo.expect_fetch_timeout_policy().returning(move || {
            calls_in_mock.fetch_add(1, Ordering::SeqCst);
            Ok(Some(record(3.0, "HR")))
        });
        let cache = PolicyCache::new(Arc::new(repo), 2.0, 1.0, 2.0);

        cache.start_auto_refresh();
        assert!(cache.snapshot().auto_refresh_active);

        tokio::time::sleep(Duration::from_secs(3600 * 2 + 10)).await;
        assert!(calls.load(Ordering::SeqCst) >= 2);

        cache.stop_auto_refresh();
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_auto_refresh_replaces_the_timer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_mock = Arc::clone(&calls);
        let mut repo = MockPolicyRepository::new();
        repo.expect_fetch_timeout_policy().returning(move || {
            calls_in_mock.fetch_add(1, Ordering::SeqCst);
            Ok(Some(record(3.0, "HR")))
        });
        let cache = PolicyCache::new(Arc::new(repo), 2.0, 1.0, 2.0);

        cache.start_auto_refresh();
        cache.start_auto_refresh();
        tokio::time::sleep(Duration::from_secs(3600 + 10)).await;

        // one immediate tick plus one periodic tick from a single timer
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        cache.stop_auto_refresh();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_further_refreshes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_mock = Arc::clone(&calls);
        let mut repo = MockPolicyRepository::new();
        repo.expect_fetch_timeout_policy().returning(move || {
            calls_in_mock.fetch_add(1, Ordering::SeqCst);
            Ok(Some(record(3.0, "HR")))
        });
        let cache = PolicyCache::new(Arc::new(repo), 2.0, 1.0, 2.0);

        cache.start_auto_refresh();
        tokio::time::sleep(Duration::from_secs(10)).await;
        cache.stop_auto_refresh();
        let seen = calls.load(Ordering::SeqCst);
        let last_update = cache.snapshot().last_update;

        tokio::time::sleep(Duration::from_secs(3600 * 3)).await;
        assert_eq!(calls.load(Ordering::SeqCst), seen);
        assert_eq!(cache.snapshot().last_update, last_update);
        assert!(!cache.snapshot().auto_refresh_active);

        // stopping again is a no-op
        cache.stop_auto_refresh();
    }
}
