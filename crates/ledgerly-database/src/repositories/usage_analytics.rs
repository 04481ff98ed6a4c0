//! Usage analytics repository implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use ledgerly_core::error::{AppError, ErrorKind};
use ledgerly_core::result::AppResult;

use crate::store::UsageLog;

/// Repository for per-day usage accounting.
#[derive(Debug, Clone)]
pub struct UsageAnalyticsRepository {
    pool: PgPool,
}

impl UsageAnalyticsRepository {
    /// Create a new usage analytics repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageLog for UsageAnalyticsRepository {
    async fn record_query(
        &self,
        entitlement_id: Uuid,
        day: NaiveDate,
        model: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO usage_analytics (entitlement_id, day, query_count, model_breakdown)
            VALUES ($1, $2, 1, jsonb_build_object($3::text, 1))
            ON CONFLICT (entitlement_id, day) DO UPDATE
            SET query_count = usage_analytics.query_count + 1,
                model_breakdown = jsonb_set(
                    COALESCE(usage_analytics.model_breakdown, '{}'::jsonb),
                    ARRAY[$3::text],
                    (COALESCE(usage_analytics.model_breakdown->>$3::text, '0')::int + 1)::text::jsonb
                )
            "#,
        )
        .bind(entitlement_id)
        .bind(day)
        .bind(model)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record daily usage", e)
        })?;

        Ok(())
    }
}
