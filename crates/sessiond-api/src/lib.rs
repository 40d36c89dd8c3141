//! # Sessiond API
//!
//! HTTP handlers, identity extraction, DTOs, and the response envelope.

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod state;
