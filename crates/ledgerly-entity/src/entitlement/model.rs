//! Entitlement record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use ledgerly_core::types::Limit;

use super::status::SubscriptionStatus;
use super::tier::Tier;

/// The stored tier/usage/subscription-status record for one identity.
///
/// One row exists per identity-provider subject, created lazily on the
/// first gated chat call or the first explicit usage reset.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entitlement {
    /// Row primary key.
    pub id: Uuid,
    /// Identity-provider user id (unique).
    pub subject: String,
    /// Email address on record.
    pub email: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Business name, if provided during onboarding.
    pub business_name: Option<String>,
    /// Business structure label (e.g. "LLC", "Sole Proprietorship").
    pub business_type: Option<String>,
    /// Current service tier.
    pub tier: Tier,
    /// Queries consumed this cycle.
    pub query_count: i32,
    /// Stored query limit (sentinel encodes unlimited).
    pub query_limit: i32,
    /// Subscription lifecycle status.
    pub status: SubscriptionStatus,
    /// Processor customer id, once known.
    pub billing_customer_id: Option<String>,
    /// Processor subscription id, once known.
    pub billing_subscription_id: Option<String>,
    /// Start of the current billing period.
    pub current_period_start: Option<DateTime<Utc>>,
    /// End of the current billing period.
    pub current_period_end: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Entitlement {
    /// The query limit as a tagged value.
    pub fn limit(&self) -> Limit {
        Limit::from_stored(self.query_limit)
    }

    /// Queries consumed this cycle, clamped at zero.
    pub fn count(&self) -> u32 {
        self.query_count.max(0) as u32
    }

    /// Queries remaining this cycle.
    pub fn remaining(&self) -> u32 {
        self.limit().remaining(self.count())
    }

    /// Whether the gate would permit another query right now.
    pub fn permits_query(&self) -> bool {
        self.limit().permits(self.count())
    }
}

/// Fields for lazily creating an entitlement record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntitlement {
    /// Identity-provider user id.
    pub subject: String,
    /// Email address.
    pub email: String,
    /// Initial tier.
    pub tier: Tier,
    /// Initial query count.
    pub query_count: i32,
    /// Initial stored query limit.
    pub query_limit: i32,
    /// Initial status.
    pub status: SubscriptionStatus,
}

impl NewEntitlement {
    /// A fresh free-tier record with nothing consumed.
    pub fn free(subject: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            email: email.into(),
            tier: Tier::Free,
            query_count: 0,
            query_limit: Tier::Free.query_limit().to_stored(),
            status: SubscriptionStatus::Active,
        }
    }
}
