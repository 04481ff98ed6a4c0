//! Response DTOs.

use serde::{Deserialize, Serialize};

use ledgerly_entity::{Entitlement, SubscriptionSnapshot, SubscriptionStatus, Tier};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Database reachability.
    pub database: String,
    /// Database round-trip latency in milliseconds.
    pub database_latency_ms: u64,
}

/// Current usage counters for the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageResponse {
    /// Queries consumed this cycle.
    pub query_count: u32,
    /// Stored query limit.
    pub query_limit: i32,
    /// Queries remaining this cycle.
    pub remaining: u32,
    /// Current tier.
    pub tier: Tier,
    /// Subscription lifecycle status.
    pub status: SubscriptionStatus,
}

impl From<&Entitlement> for UsageResponse {
    fn from(record: &Entitlement) -> Self {
        Self {
            query_count: record.count(),
            query_limit: record.query_limit,
            remaining: record.remaining(),
            tier: record.tier,
            status: record.status,
        }
    }
}

/// Tier update confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierUpdateResponse {
    /// The tier now in effect.
    pub tier: Tier,
    /// Stored query limit under the new tier.
    pub query_limit: i32,
    /// Queries consumed this cycle.
    pub query_count: u32,
}

/// Cancellation confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct CancelResponse {
    /// Human-readable summary.
    pub message: String,
    /// The subscriptions that were processed.
    pub subscriptions: Vec<SubscriptionSnapshot>,
}

/// Subscription status report.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Active or period-end-flagged subscriptions.
    pub subscriptions: Vec<SubscriptionSnapshot>,
    /// Whether any subscription currently grants access.
    pub has_active: bool,
}

/// Created checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// Session id at the processor.
    pub session_id: String,
    /// Hosted payment page URL.
    pub url: String,
}

/// Webhook acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    /// Always true; the processor only needs a 2xx.
    pub received: bool,
}
