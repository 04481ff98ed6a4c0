//! Subscription change audit events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::super::entitlement::Tier;

/// A recorded subscription change for one entitlement.
///
/// Written by the tier-update and cancel endpoints and by the webhook
/// receiver; kept for support and compliance review.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriptionEvent {
    /// Row primary key.
    pub id: Uuid,
    /// Owning entitlement row.
    pub entitlement_id: Uuid,
    /// Event type label (e.g. `tier_updated`, `customer.subscription.deleted`).
    pub event_type: String,
    /// Processor event id, for webhook-sourced events.
    pub provider_event_id: Option<String>,
    /// Tier before the change.
    pub old_tier: Option<Tier>,
    /// Tier after the change.
    pub new_tier: Option<Tier>,
    /// Additional event details.
    pub event_data: Option<serde_json::Value>,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
}

/// Fields for recording a subscription event.
#[derive(Debug, Clone)]
pub struct NewSubscriptionEvent {
    /// Owning entitlement row.
    pub entitlement_id: Uuid,
    /// Event type label.
    pub event_type: String,
    /// Processor event id, for webhook-sourced events.
    pub provider_event_id: Option<String>,
    /// Tier before the change.
    pub old_tier: Option<Tier>,
    /// Tier after the change.
    pub new_tier: Option<Tier>,
    /// Additional event details.
    pub event_data: Option<serde_json::Value>,
}

impl NewSubscriptionEvent {
    /// A tier-change event.
    pub fn tier_change(entitlement_id: Uuid, old_tier: Tier, new_tier: Tier) -> Self {
        Self {
            entitlement_id,
            event_type: "tier_updated".to_string(),
            provider_event_id: None,
            old_tier: Some(old_tier),
            new_tier: Some(new_tier),
            event_data: None,
        }
    }

    /// A cancellation event for one processed subscription.
    pub fn cancellation(entitlement_id: Uuid, subscription_id: &str, immediate: bool) -> Self {
        Self {
            entitlement_id,
            event_type: if immediate {
                "subscription_canceled".to_string()
            } else {
                "subscription_cancel_scheduled".to_string()
            },
            provider_event_id: None,
            old_tier: None,
            new_tier: None,
            event_data: Some(serde_json::json!({ "subscription_id": subscription_id })),
        }
    }
}
