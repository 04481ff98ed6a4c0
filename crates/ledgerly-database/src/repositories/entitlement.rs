//! Entitlement repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use ledgerly_core::error::{AppError, ErrorKind};
use ledgerly_core::result::AppResult;
use ledgerly_entity::entitlement::{Entitlement, NewEntitlement, SubscriptionStatus, Tier};

use crate::store::{BillingSync, EntitlementStore};

/// Repository for entitlement record queries and mutations.
#[derive(Debug, Clone)]
pub struct EntitlementRepository {
    pool: PgPool,
}

impl EntitlementRepository {
    /// Create a new entitlement repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitlementStore for EntitlementRepository {
    async fn find_by_subject(&self, subject: &str) -> AppResult<Option<Entitlement>> {
        sqlx::query_as::<_, Entitlement>("SELECT * FROM entitlements WHERE subject = $1")
            .bind(subject)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to find entitlement by subject",
                    e,
                )
            })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Entitlement>> {
        sqlx::query_as::<_, Entitlement>(
            "SELECT * FROM entitlements WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find entitlement by email", e)
        })
    }

    async fn find_by_billing_customer(
        &self,
        customer_id: &str,
    ) -> AppResult<Option<Entitlement>> {
        sqlx::query_as::<_, Entitlement>(
            "SELECT * FROM entitlements WHERE billing_customer_id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to find entitlement by billing customer",
                e,
            )
        })
    }

    async fn get_or_create(&self, new: &NewEntitlement) -> AppResult<Entitlement> {
        // Insert-if-absent, then read back. The conflict arm leaves an
        // existing row untouched.
        let inserted = sqlx::query_as::<_, Entitlement>(
            r#"
            INSERT INTO entitlements (subject, email, tier, query_count, query_limit, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (subject) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&new.subject)
        .bind(&new.email)
        .bind(new.tier)
        .bind(new.query_count)
        .bind(new.query_limit)
        .bind(new.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create entitlement", e)
        })?;

        if let Some(record) = inserted {
            return Ok(record);
        }

        self.find_by_subject(&new.subject).await?.ok_or_else(|| {
            AppError::database("Entitlement vanished between insert and read-back")
        })
    }

    async fn try_consume(&self, subject: &str) -> AppResult<Option<Entitlement>> {
        // Single conditional update: concurrent callers at a one-query
        // margin cannot both pass.
        sqlx::query_as::<_, Entitlement>(
            r#"
            UPDATE entitlements
            SET query_count = query_count + 1, updated_at = NOW()
            WHERE subject = $1 AND query_count < query_limit
            RETURNING *
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to consume query", e))
    }

    async fn reset_usage(&self, subject: &str) -> AppResult<Entitlement> {
        sqlx::query_as::<_, Entitlement>(
            r#"
            UPDATE entitlements
            SET query_count = 0, updated_at = NOW()
            WHERE subject = $1
            RETURNING *
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reset usage", e))?
        .ok_or_else(|| AppError::not_found("No entitlement record for subject"))
    }

    async fn set_tier(
        &self,
        subject: &str,
        tier: Tier,
        status: SubscriptionStatus,
        reset_count: bool,
    ) -> AppResult<Entitlement> {
        sqlx::query_as::<_, Entitlement>(
            r#"
            UPDATE entitlements
            SET tier = $2,
                query_limit = $3,
                query_count = CASE WHEN $4 THEN 0 ELSE query_count END,
                status = $5,
                updated_at = NOW()
            WHERE subject = $1
            RETURNING *
            "#,
        )
        .bind(subject)
        .bind(tier)
        .bind(tier.query_limit().to_stored())
        .bind(reset_count)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set tier", e))?
        .ok_or_else(|| AppError::not_found("No entitlement record for subject"))
    }

    async fn sync_billing(&self, subject: &str, sync: &BillingSync) -> AppResult<Entitlement> {
        sqlx::query_as::<_, Entitlement>(
            r#"
            UPDATE entitlements
            SET billing_customer_id = COALESCE($2, billing_customer_id),
                billing_subscription_id = COALESCE($3, billing_subscription_id),
                status = COALESCE($4, status),
                current_period_start = COALESCE($5, current_period_start),
                current_period_end = COALESCE($6, current_period_end),
                updated_at = NOW()
            WHERE subject = $1
            RETURNING *
            "#,
        )
        .bind(subject)
        .bind(&sync.customer_id)
        .bind(&sync.subscription_id)
        .bind(sync.status)
        .bind(sync.period_start)
        .bind(sync.period_end)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to sync billing", e))?
        .ok_or_else(|| AppError::not_found("No entitlement record for subject"))
    }

    async fn delete_by_subject(&self, subject: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM entitlements WHERE subject = $1")
            .bind(subject)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete entitlement", e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
