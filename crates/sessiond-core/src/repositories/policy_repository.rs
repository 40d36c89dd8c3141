//! Timeout policy repository trait (port)

use async_trait::async_trait;

use crate::domain::PolicyRecord;
use crate::error::DomainError;

/// Query interface over the external timeout policy source.
///
/// The policy is a singleton record; implementations return at most one row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PolicyRepository: Send + Sync {
    async fn fetch_timeout_policy(&self) -> Result<Option<PolicyRecord>, DomainError>;
}
