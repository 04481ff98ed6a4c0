//! Store trait seams over the relational schema.
//!
//! Services depend on these traits rather than on the sqlx repositories
//! directly, so that gate and lifecycle semantics can be exercised against
//! in-memory doubles.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use ledgerly_core::result::AppResult;
use ledgerly_entity::entitlement::{Entitlement, NewEntitlement, SubscriptionStatus, Tier};
use ledgerly_entity::subscription::NewSubscriptionEvent;
use ledgerly_entity::trial::IpUsage;

/// Opportunistic sync of billing fields onto an entitlement record.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct BillingSync {
    /// Processor customer id.
    pub customer_id: Option<String>,
    /// Processor subscription id.
    pub subscription_id: Option<String>,
    /// New lifecycle status.
    pub status: Option<SubscriptionStatus>,
    /// Start of the current billing period.
    pub period_start: Option<DateTime<Utc>>,
    /// End of the current billing period.
    pub period_end: Option<DateTime<Utc>>,
}

/// Persistence operations for entitlement records.
#[async_trait]
pub trait EntitlementStore: Send + Sync + 'static {
    /// Find a record by identity-provider subject.
    async fn find_by_subject(&self, subject: &str) -> AppResult<Option<Entitlement>>;

    /// Find a record by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Entitlement>>;

    /// Find a record by processor customer id.
    async fn find_by_billing_customer(&self, customer_id: &str)
    -> AppResult<Option<Entitlement>>;

    /// Return the record for this subject, creating it if absent.
    ///
    /// An existing record is returned unchanged.
    async fn get_or_create(&self, new: &NewEntitlement) -> AppResult<Entitlement>;

    /// Atomically consume one query if the limit permits.
    ///
    /// Returns the updated record when a query was consumed, or `None`
    /// when the record is missing or the limit was already exhausted.
    /// Implementations must make this a single conditional update so that
    /// two concurrent calls can never both pass a one-query margin.
    async fn try_consume(&self, subject: &str) -> AppResult<Option<Entitlement>>;

    /// Set the query count back to zero, regardless of tier.
    async fn reset_usage(&self, subject: &str) -> AppResult<Entitlement>;

    /// Move a record to the given tier.
    ///
    /// The stored limit always follows the tier; the count is zeroed only
    /// when `reset_count` is set.
    async fn set_tier(
        &self,
        subject: &str,
        tier: Tier,
        status: SubscriptionStatus,
        reset_count: bool,
    ) -> AppResult<Entitlement>;

    /// Apply a billing-fields sync to a record.
    async fn sync_billing(&self, subject: &str, sync: &BillingSync) -> AppResult<Entitlement>;

    /// Delete the record for a subject. Returns `true` if a row was removed.
    async fn delete_by_subject(&self, subject: &str) -> AppResult<bool>;
}

/// Append-only log of subscription changes.
#[async_trait]
pub trait EventLog: Send + Sync + 'static {
    /// Record one subscription event.
    ///
    /// Events carrying a processor event id are recorded at most once;
    /// replays are ignored.
    async fn record(&self, event: &NewSubscriptionEvent) -> AppResult<()>;

    /// Whether an event with this processor event id was already recorded.
    async fn seen_provider_event(&self, provider_event_id: &str) -> AppResult<bool>;
}

/// Anonymous trial counters, keyed by client IP or fingerprint.
#[async_trait]
pub trait TrialStore: Send + Sync + 'static {
    /// Atomically consume one trial query for this client.
    ///
    /// Creates the row with the given allowance on first contact. Returns
    /// the updated row when a query was consumed, or `None` when the
    /// allowance was already exhausted. Same single-statement discipline
    /// as `EntitlementStore::try_consume`.
    async fn try_consume(&self, client_key: &str, limit: u32) -> AppResult<Option<IpUsage>>;

    /// Current counters for a client, if any.
    async fn find(&self, client_key: &str) -> AppResult<Option<IpUsage>>;
}

/// Per-day usage accounting.
#[async_trait]
pub trait UsageLog: Send + Sync + 'static {
    /// Count one query against the given day's row, creating it if absent.
    async fn record_query(
        &self,
        entitlement_id: Uuid,
        day: NaiveDate,
        model: &str,
    ) -> AppResult<()>;
}
