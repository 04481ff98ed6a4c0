//! Wire types for the payment processor's REST API.

use serde::Deserialize;

use ledgerly_core::traits::{BillingCustomer, BillingSubscription};

/// Generic list envelope (`{"data": [...]}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    /// The listed objects.
    pub data: Vec<T>,
}

/// A customer object on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct WireCustomer {
    /// Customer id.
    pub id: String,
    /// Email on file.
    pub email: Option<String>,
}

impl From<WireCustomer> for BillingCustomer {
    fn from(c: WireCustomer) -> Self {
        Self {
            id: c.id,
            email: c.email,
        }
    }
}

/// A subscription object on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct WireSubscription {
    /// Subscription id.
    pub id: String,
    /// Owning customer id.
    pub customer: String,
    /// Processor status string.
    pub status: String,
    /// Whether the subscription will cancel at period end.
    #[serde(default)]
    pub cancel_at_period_end: bool,
    /// Unix timestamp of the current period end.
    pub current_period_end: Option<i64>,
    /// Unix timestamp of cancellation.
    pub canceled_at: Option<i64>,
    /// Subscribed items.
    pub items: Option<ListEnvelope<WireSubscriptionItem>>,
}

/// One item on a subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct WireSubscriptionItem {
    /// The price on this item.
    pub price: Option<WirePrice>,
}

/// A price reference.
#[derive(Debug, Clone, Deserialize)]
pub struct WirePrice {
    /// Price id.
    pub id: String,
}

impl From<WireSubscription> for BillingSubscription {
    fn from(s: WireSubscription) -> Self {
        let price_id = s
            .items
            .as_ref()
            .and_then(|items| items.data.first())
            .and_then(|item| item.price.as_ref())
            .map(|price| price.id.clone());

        Self {
            id: s.id,
            customer_id: s.customer,
            status: s.status,
            cancel_at_period_end: s.cancel_at_period_end,
            current_period_end: s.current_period_end,
            canceled_at: s.canceled_at,
            price_id,
        }
    }
}

/// A checkout session object on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct WireCheckoutSession {
    /// Session id.
    pub id: String,
    /// Hosted payment page URL.
    pub url: Option<String>,
}
