//! Subscription event repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use ledgerly_core::error::{AppError, ErrorKind};
use ledgerly_core::result::AppResult;
use ledgerly_entity::subscription::NewSubscriptionEvent;

use crate::store::EventLog;

/// Repository for the subscription change audit log.
#[derive(Debug, Clone)]
pub struct SubscriptionEventRepository {
    pool: PgPool,
}

impl SubscriptionEventRepository {
    /// Create a new subscription event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventLog for SubscriptionEventRepository {
    async fn record(&self, event: &NewSubscriptionEvent) -> AppResult<()> {
        // Unique index on provider_event_id makes webhook replays no-ops.
        sqlx::query(
            r#"
            INSERT INTO subscription_events
                (entitlement_id, event_type, provider_event_id, old_tier, new_tier, event_data)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (provider_event_id) DO NOTHING
            "#,
        )
        .bind(event.entitlement_id)
        .bind(&event.event_type)
        .bind(&event.provider_event_id)
        .bind(event.old_tier)
        .bind(event.new_tier)
        .bind(&event.event_data)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record subscription event", e)
        })?;

        Ok(())
    }

    async fn seen_provider_event(&self, provider_event_id: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subscription_events WHERE provider_event_id = $1",
        )
        .bind(provider_event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check provider event", e)
        })?;

        Ok(count > 0)
    }
}
