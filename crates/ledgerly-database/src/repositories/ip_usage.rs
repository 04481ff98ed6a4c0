//! Anonymous trial repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use ledgerly_core::error::{AppError, ErrorKind};
use ledgerly_core::result::AppResult;
use ledgerly_entity::trial::IpUsage;

use crate::store::TrialStore;

/// Repository for per-client trial counters.
#[derive(Debug, Clone)]
pub struct IpUsageRepository {
    pool: PgPool,
}

impl IpUsageRepository {
    /// Create a new trial repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrialStore for IpUsageRepository {
    async fn try_consume(&self, client_key: &str, limit: u32) -> AppResult<Option<IpUsage>> {
        // Upsert and increment in one statement. The conflict arm's WHERE
        // makes an exhausted client produce no row instead of an update.
        sqlx::query_as::<_, IpUsage>(
            r#"
            INSERT INTO ip_usage (ip_address, query_count, query_limit)
            VALUES ($1, 1, $2)
            ON CONFLICT (ip_address) DO UPDATE
            SET query_count = ip_usage.query_count + 1, last_used = NOW()
            WHERE ip_usage.query_count < ip_usage.query_limit
            RETURNING *
            "#,
        )
        .bind(client_key)
        .bind(limit as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to consume trial query", e)
        })
    }

    async fn find(&self, client_key: &str) -> AppResult<Option<IpUsage>> {
        sqlx::query_as::<_, IpUsage>("SELECT * FROM ip_usage WHERE ip_address = $1")
            .bind(client_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find trial counters", e)
            })
    }
}
