//! # Sessiond Core - Domain Module
//!
//! Domain entities for session tracking and the timeout policy.

pub mod policy;
pub mod session;

// Re-export all entities
pub use policy::{PolicyConfig, PolicyRecord, TimeoutPolicy};
pub use session::{check_validity, SessionEntry, SessionStatus, SessionValidity};
