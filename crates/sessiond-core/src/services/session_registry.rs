// ============================================================================
// Sessiond Core - Session Registry
// File: crates/sessiond-core/src/services/session_registry.rs
// ============================================================================
//! In-memory keyed store of per-user session state.
//!
//! The registry performs no TTL sweeping of its own. Entries snapshot their
//! applicable timeout at touch time, so expiry is evaluated lazily by the
//! validity check rather than by the store.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::SessionEntry;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Upsert; unconditionally overwrites any prior entry for the user.
    pub fn put(&self, entry: SessionEntry) {
        self.sessions
            .write()
            .unwrap()
            .insert(entry.user_id.clone(), entry);
    }

    pub fn get(&self, user_id: &str) -> Option<SessionEntry> {
        self.sessions.read().unwrap().get(user_id).cloned()
    }

    /// Removes if present; no-op otherwise.
    pub fn delete(&self, user_id: &str) {
        self.sessions.write().unwrap().remove(user_id);
    }

    /// Snapshot of all registered user ids at call time, not a live view.
    pub fn user_ids(&self) -> Vec<String> {
        self.sessions.read().unwrap().keys().cloned().collect()
    }

    /// Snapshot of all current entries.
    pub fn entries(&self) -> Vec<SessionEntry> {
        self.sessions.read().unwrap().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().unwrap().is_empty()
    }

    pub fn clear(&self) {
        self.sessions.write().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(user_id: &str, timeout_hours: f64) -> SessionEntry {
        SessionEntry {
            user_id: user_id.to_string(),
            last_activity: Utc::now(),
            timeout_hours,
        }
    }

    #[test]
    fn put_and_get() {
        let registry = SessionRegistry::new();
        registry.put(entry("alice", 2.0));
        let found = registry.get("alice").unwrap();
        assert_eq!(found.user_id, "alice");
        assert_eq!(found.timeout_hours, 2.0);
        assert!(registry.get("bob").is_none());
    }

    #[test]
    fn put_overwrites_existing_entry() {
        let registry = SessionRegistry::new();
        registry.put(entry("alice", 1.0));
        registry.put(entry("alice", 3.0));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("alice").unwrap().timeout_hours, 3.0);
    }

    #[test]
    fn delete_is_idempotent() {
        let registry = SessionRegistry::new();
        registry.put(entry("alice", 2.0));
        registry.delete("alice");
        registry.delete("alice");
        assert!(registry.get("alice").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn user_ids_is_a_snapshot() {
        let registry = SessionRegistry::new();
        registry.put(entry("alice", 2.0));
        registry.put(entry("bob", 2.0));
        let mut ids = registry.user_ids();
        ids.sort();
        assert_eq!(ids, vec!["alice".to_string(), "bob".to_string()]);

        registry.delete("bob");
        assert_eq!(ids.len(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let registry = SessionRegistry::new();
        registry.put(entry("alice", 2.0));
        registry.put(entry("bob", 2.0));
        registry.clear();
        assert!(registry.is_empty());
    }
}
