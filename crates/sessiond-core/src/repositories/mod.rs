//! Repository traits (ports)

pub mod policy_repository;

pub use policy_repository::PolicyRepository;

#[cfg(test)]
pub use policy_repository::MockPolicyRepository;
