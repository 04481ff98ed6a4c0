//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use ledgerly_service::subscription::CancelMode;

/// Tier update request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TierUpdateRequest {
    /// Target tier name (`free`, `basic`, or `elite`).
    #[validate(length(min = 1, message = "Tier is required"))]
    pub tier: String,
}

/// Cancellation request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    /// When the cancellation takes effect; immediate when omitted.
    #[serde(default)]
    pub cancel_at: Option<CancelMode>,
}

impl CancelRequest {
    /// The effective cancellation mode.
    pub fn mode(&self) -> CancelMode {
        self.cancel_at.unwrap_or(CancelMode::Immediate)
    }
}

/// Checkout request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    /// Plan to purchase.
    #[validate(length(min = 1, message = "Plan id is required"))]
    pub plan_id: String,
}

/// Account deletion request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDeleteRequest {
    /// Must be `true`; deleting an account is irreversible.
    pub confirm_deletion: bool,
    /// Whether to include a profile export in the receipt.
    #[serde(default)]
    pub export_data: bool,
}

/// Chat request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatMessageRequest {
    /// The user's message.
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
    /// Conversation to continue; omitted to start a new one.
    pub conversation_id: Option<String>,
    /// Requested model label.
    pub model: Option<String>,
}
