//! Live subscription snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerly_core::traits::BillingSubscription;

/// A read-through view of one subscription at the payment processor.
///
/// Fetched live by customer email; never treated as a local source of
/// truth beyond the opportunistic sync of the entitlement record's
/// tier/status fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionSnapshot {
    /// Processor subscription id.
    pub id: String,
    /// Processor status string.
    pub status: String,
    /// Whether the subscription will cancel at period end.
    pub cancel_at_period_end: bool,
    /// End of the current billing period.
    pub current_period_end: Option<DateTime<Utc>>,
    /// When the subscription was canceled, if it was.
    pub canceled_at: Option<DateTime<Utc>>,
    /// Plan price id, where reported.
    pub plan: Option<String>,
}

impl SubscriptionSnapshot {
    /// Whether this subscription currently grants access.
    pub fn is_active(&self) -> bool {
        self.status == "active" || self.status == "trialing"
    }
}

impl From<BillingSubscription> for SubscriptionSnapshot {
    fn from(sub: BillingSubscription) -> Self {
        Self {
            id: sub.id,
            status: sub.status,
            cancel_at_period_end: sub.cancel_at_period_end,
            current_period_end: sub
                .current_period_end
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            canceled_at: sub
                .canceled_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            plan: sub.price_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_provider_subscription() {
        let snapshot: SubscriptionSnapshot = BillingSubscription {
            id: "sub_1".into(),
            customer_id: "cus_1".into(),
            status: "active".into(),
            cancel_at_period_end: true,
            current_period_end: Some(1_735_689_600),
            canceled_at: None,
            price_id: Some("price_basic".into()),
        }
        .into();

        assert!(snapshot.is_active());
        assert!(snapshot.cancel_at_period_end);
        assert_eq!(snapshot.plan.as_deref(), Some("price_basic"));
        assert!(snapshot.current_period_end.is_some());
        assert!(snapshot.canceled_at.is_none());
    }
}
