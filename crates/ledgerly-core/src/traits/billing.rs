//! Billing provider seam.
//!
//! The payment processor is treated as an opaque capability provider:
//! customers are looked up by email (duplicate customer records per email
//! are possible and must all be processed), subscriptions are listed,
//! canceled outright, or flagged to cancel at period end.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A customer record at the payment processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingCustomer {
    /// Processor-assigned customer id.
    pub id: String,
    /// Email on file.
    pub email: Option<String>,
}

/// A subscription object as the processor reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingSubscription {
    /// Processor-assigned subscription id.
    pub id: String,
    /// Owning customer id.
    pub customer_id: String,
    /// Processor status string (`active`, `canceled`, `past_due`, ...).
    pub status: String,
    /// Whether the subscription is flagged to cancel at period end.
    pub cancel_at_period_end: bool,
    /// Unix timestamp of the current period end.
    pub current_period_end: Option<i64>,
    /// Unix timestamp of cancellation, if canceled.
    pub canceled_at: Option<i64>,
    /// Price identifier of the subscribed plan.
    pub price_id: Option<String>,
}

/// A hosted checkout session created at the processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Session id.
    pub id: String,
    /// Hosted payment page URL.
    pub url: String,
}

/// Parameters for creating a hosted checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutParams {
    /// Pre-registered price id at the processor, if configured.
    pub price_id: Option<String>,
    /// Internal plan identifier, carried in session metadata.
    pub plan_id: String,
    /// Display name for ad-hoc price creation.
    pub plan_name: String,
    /// Monthly amount in the smallest currency unit.
    pub amount_cents: i64,
    /// ISO currency code.
    pub currency: String,
    /// Model label carried in session metadata.
    pub model: String,
    /// Redirect on successful payment.
    pub success_url: String,
    /// Redirect on abandoned checkout.
    pub cancel_url: String,
}

/// Operations consumed from the external payment processor.
///
/// Mutating calls (cancel, flag) are not idempotent at the processor and
/// must never be retried automatically.
#[async_trait]
pub trait BillingProvider: Send + Sync + 'static {
    /// List all customers matching an email address.
    async fn customers_by_email(&self, email: &str) -> AppResult<Vec<BillingCustomer>>;

    /// List a customer's subscriptions with status `active`.
    async fn active_subscriptions(&self, customer_id: &str)
    -> AppResult<Vec<BillingSubscription>>;

    /// Cancel a subscription immediately.
    async fn cancel_subscription(&self, subscription_id: &str) -> AppResult<BillingSubscription>;

    /// Flag a subscription to cancel at the end of the current period.
    async fn cancel_at_period_end(&self, subscription_id: &str)
    -> AppResult<BillingSubscription>;

    /// Create a hosted checkout session for a monthly subscription.
    async fn create_checkout_session(&self, params: CheckoutParams)
    -> AppResult<CheckoutSession>;
}
