//! PostgreSQL repository implementations

pub mod policy_repo_impl;

pub use policy_repo_impl::PgPolicyRepository;
