//! Billing webhook receiver.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use chrono::Utc;
use tracing::warn;

use ledgerly_billing::{WebhookEvent, verify_signature};
use ledgerly_core::error::AppError;

use crate::error::ApiError;

use crate::dto::response::WebhookAck;
use crate::state::AppState;

/// POST /api/webhook/billing
///
/// Takes the raw body so the signature is computed over exactly the
/// bytes the processor signed. Signature failures are reported as 400
/// with no processing, matching what the processor's delivery retry
/// logic expects.
pub async fn billing_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::validation("Missing webhook signature header"))?;

    let billing = &state.config.billing;
    if let Err(e) = verify_signature(
        &body,
        signature,
        &billing.webhook_secret,
        billing.webhook_tolerance_seconds,
        Utc::now().timestamp(),
    ) {
        warn!(error = %e, "Webhook signature rejected");
        return Err(AppError::validation("Invalid webhook signature").into());
    }

    let event = WebhookEvent::parse(&body)?;
    state
        .subscription_service
        .apply_webhook_event(&event)
        .await?;

    Ok(Json(WebhookAck { received: true }))
}
