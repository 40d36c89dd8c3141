//! # Sessiond Infrastructure
//!
//! Database implementations (adapters) for the session service.

pub mod database;

pub use database::{create_pool, PgPolicyRepository};
