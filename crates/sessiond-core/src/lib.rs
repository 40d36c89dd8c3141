//! # Sessiond Core
//!
//! Domain entities, services, and repository traits for the session
//! activity-tracking service. Sessions live in process memory only and are
//! expired by inactivity, independent of any token lifetime.

pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

pub use domain::*;
pub use error::DomainError;
