//! Domain services (session tracking)

pub mod policy_cache;
pub mod session_registry;
pub mod session_service;

pub use policy_cache::PolicyCache;
pub use session_registry::SessionRegistry;
pub use session_service::SessionService;
