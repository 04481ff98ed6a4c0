//! Webhook signature verification and event parsing.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use ledgerly_core::{AppError, AppResult};

use crate::types::WireSubscription;

type HmacSha256 = Hmac<Sha256>;

/// Verify a webhook signature header of the form `t=<timestamp>,v1=<hex>`.
///
/// The signed payload is `{timestamp}.{raw body}`, authenticated with
/// HMAC-SHA256 under the endpoint secret. The timestamp must fall within
/// `tolerance_seconds` of `now_unix` to reject replayed captures.
pub fn verify_signature(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
    tolerance_seconds: i64,
    now_unix: i64,
) -> AppResult<()> {
    let parts: std::collections::HashMap<&str, &str> = signature_header
        .split(',')
        .filter_map(|part| {
            let mut kv = part.splitn(2, '=');
            Some((kv.next()?, kv.next()?))
        })
        .collect();

    let timestamp = parts
        .get("t")
        .ok_or_else(|| AppError::unauthorized("Webhook signature header missing timestamp"))?;
    let signature = parts
        .get("v1")
        .ok_or_else(|| AppError::unauthorized("Webhook signature header missing signature"))?;

    let ts: i64 = timestamp
        .parse()
        .map_err(|_| AppError::unauthorized("Webhook signature timestamp is not numeric"))?;
    if (now_unix - ts).abs() > tolerance_seconds {
        return Err(AppError::unauthorized(
            "Webhook signature timestamp outside tolerance",
        ));
    }

    let body = std::str::from_utf8(payload)
        .map_err(|_| AppError::unauthorized("Webhook payload is not valid UTF-8"))?;
    let signed_payload = format!("{timestamp}.{body}");

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| AppError::unauthorized("Webhook secret is invalid"))?;
    mac.update(signed_payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if expected.as_bytes().ct_eq(signature.as_bytes()).into() {
        Ok(())
    } else {
        Err(AppError::unauthorized("Webhook signature mismatch"))
    }
}

/// A parsed webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Provider-assigned event id, used for replay deduplication.
    pub id: String,
    /// Event type, e.g. `checkout.session.completed`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// The event payload.
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    /// The object the event describes, kept untyped until the event
    /// type is known.
    pub object: serde_json::Value,
}

impl WebhookEvent {
    /// Parse an event from the raw request body.
    pub fn parse(payload: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(payload)
            .map_err(|e| AppError::validation(format!("Malformed webhook payload: {e}")))
    }

    /// Extract the checkout session fields the tier resolver needs.
    pub fn checkout_session(&self) -> AppResult<CheckoutCompleted> {
        serde_json::from_value(self.data.object.clone())
            .map_err(|e| AppError::validation(format!("Malformed checkout session object: {e}")))
    }

    /// Extract the subscription object from a subscription lifecycle event.
    pub fn subscription(&self) -> AppResult<WireSubscription> {
        serde_json::from_value(self.data.object.clone())
            .map_err(|e| AppError::validation(format!("Malformed subscription object: {e}")))
    }
}

/// The slice of a completed checkout session the service consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutCompleted {
    /// Customer id, when the processor attached one.
    pub customer: Option<String>,
    /// Created subscription id.
    pub subscription: Option<String>,
    /// Buyer details captured at checkout.
    pub customer_details: Option<CheckoutCustomerDetails>,
    /// Metadata set when the session was created.
    #[serde(default)]
    pub metadata: std::collections::HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutCustomerDetails {
    /// Email the buyer entered at checkout.
    pub email: Option<String>,
}

impl CheckoutCompleted {
    /// The plan the buyer purchased, from session metadata.
    pub fn plan_id(&self) -> Option<&str> {
        self.metadata.get("planId").map(String::as_str)
    }

    /// The buyer's email, used to locate the entitlement row.
    pub fn email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|d| d.email.as_deref())
    }
}
