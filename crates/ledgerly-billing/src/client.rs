//! Payment processor HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use ledgerly_core::config::BillingConfig;
use ledgerly_core::traits::{
    BillingCustomer, BillingProvider, BillingSubscription, CheckoutParams, CheckoutSession,
};
use ledgerly_core::{AppError, AppResult};

use crate::types::{ListEnvelope, WireCheckoutSession, WireCustomer, WireSubscription};

/// Client for the payment processor's form-encoded REST API.
///
/// Mutating calls are not idempotent at the processor and are therefore
/// never retried; callers see the first failure as-is.
#[derive(Debug, Clone)]
pub struct BillingClient {
    http: reqwest::Client,
    api_url: String,
    secret_key: String,
}

impl BillingClient {
    /// Build a client from configuration.
    pub fn new(config: &BillingConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::configuration(format!("Failed to build billing HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }

    async fn read_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, context, body = %body, "Payment processor request failed");
            return Err(AppError::external(format!(
                "Payment processor returned {status} for {context}"
            )));
        }
        response.json().await.map_err(|e| {
            AppError::external(format!("Invalid payment processor response: {e}"))
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        context: &str,
    ) -> AppResult<T> {
        let response = self
            .http
            .get(format!("{}{path}", self.api_url))
            .bearer_auth(&self.secret_key)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!(context, error = %e, "Payment processor request failed");
                AppError::external(format!("Payment processor request failed: {e}"))
            })?;
        self.read_response(response, context).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(String, String)],
        context: &str,
    ) -> AppResult<T> {
        let response = self
            .http
            .post(format!("{}{path}", self.api_url))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await
            .map_err(|e| {
                error!(context, error = %e, "Payment processor request failed");
                AppError::external(format!("Payment processor request failed: {e}"))
            })?;
        self.read_response(response, context).await
    }
}

#[async_trait]
impl BillingProvider for BillingClient {
    async fn customers_by_email(&self, email: &str) -> AppResult<Vec<BillingCustomer>> {
        debug!(email, "Listing billing customers by email");
        let list: ListEnvelope<WireCustomer> = self
            .get("/customers", &[("email", email), ("limit", "10")], "customer lookup")
            .await?;
        Ok(list.data.into_iter().map(Into::into).collect())
    }

    async fn active_subscriptions(
        &self,
        customer_id: &str,
    ) -> AppResult<Vec<BillingSubscription>> {
        debug!(customer_id, "Listing active subscriptions");
        let list: ListEnvelope<WireSubscription> = self
            .get(
                "/subscriptions",
                &[("customer", customer_id), ("status", "active")],
                "subscription lookup",
            )
            .await?;
        Ok(list.data.into_iter().map(Into::into).collect())
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> AppResult<BillingSubscription> {
        debug!(subscription_id, "Canceling subscription immediately");
        let response = self
            .http
            .delete(format!("{}/subscriptions/{subscription_id}", self.api_url))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                error!(subscription_id, error = %e, "Payment processor request failed");
                AppError::external(format!("Payment processor request failed: {e}"))
            })?;
        let wire: WireSubscription = self
            .read_response(response, "immediate cancellation")
            .await?;
        Ok(wire.into())
    }

    async fn cancel_at_period_end(
        &self,
        subscription_id: &str,
    ) -> AppResult<BillingSubscription> {
        debug!(subscription_id, "Flagging subscription to cancel at period end");
        let form = vec![("cancel_at_period_end".to_string(), "true".to_string())];
        let wire: WireSubscription = self
            .post_form(
                &format!("/subscriptions/{subscription_id}"),
                &form,
                "period-end cancellation",
            )
            .await?;
        Ok(wire.into())
    }

    async fn create_checkout_session(
        &self,
        params: CheckoutParams,
    ) -> AppResult<CheckoutSession> {
        debug!(plan_id = %params.plan_id, "Creating checkout session");

        let mut form: Vec<(String, String)> = vec![
            ("mode".into(), "subscription".into()),
            ("payment_method_types[0]".into(), "card".into()),
            ("line_items[0][quantity]".into(), "1".into()),
            ("success_url".into(), params.success_url),
            ("cancel_url".into(), params.cancel_url),
            ("metadata[planId]".into(), params.plan_id.clone()),
            ("metadata[model]".into(), params.model),
        ];

        match params.price_id {
            // A registered price id is preferred over ad-hoc price data.
            Some(price_id) => {
                form.push(("line_items[0][price]".into(), price_id));
            }
            None => {
                form.push((
                    "line_items[0][price_data][currency]".into(),
                    params.currency,
                ));
                form.push((
                    "line_items[0][price_data][product_data][name]".into(),
                    params.plan_name.clone(),
                ));
                form.push((
                    "line_items[0][price_data][product_data][description]".into(),
                    format!("Monthly subscription to {}", params.plan_name),
                ));
                form.push((
                    "line_items[0][price_data][unit_amount]".into(),
                    params.amount_cents.to_string(),
                ));
                form.push((
                    "line_items[0][price_data][recurring][interval]".into(),
                    "month".into(),
                ));
            }
        }

        let wire: WireCheckoutSession = self
            .post_form("/checkout/sessions", &form, "checkout session creation")
            .await?;

        let url = wire.url.ok_or_else(|| {
            AppError::external("Checkout session was created without a redirect URL")
        })?;

        Ok(CheckoutSession { id: wire.id, url })
    }
}
