// ============================================================================
// Sessiond Infrastructure - PostgreSQL Policy Repository
// File: crates/sessiond-infrastructure/src/database/postgres/policy_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::error;

use sessiond_core::domain::PolicyRecord;
use sessiond_core::error::DomainError;
use sessiond_core::repositories::PolicyRepository;

pub struct PgPolicyRepository {
    pool: PgPool,
}

impl PgPolicyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct TimeoutPolicyRow {
    pub time_value: f64,
    pub unit: String,
}

#[async_trait]
impl PolicyRepository for PgPolicyRepository {
    async fn fetch_timeout_policy(&self) -> Result<Option<PolicyRecord>, DomainError> {
        let row: Option<TimeoutPolicyRow> = sqlx::query_as(
            r#"
            SELECT time_value, unit
            FROM session_policy
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error fetching session timeout policy: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| PolicyRecord {
            time_value: r.time_value,
            unit: r.unit,
        }))
    }
}
