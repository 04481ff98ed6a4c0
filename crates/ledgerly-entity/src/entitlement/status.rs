//! Subscription status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Local view of the subscription lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// In good standing (the default, including for the free tier).
    Active,
    /// Canceled, either immediately or after the period ended.
    Canceled,
    /// A renewal payment failed; the processor is retrying.
    PastDue,
    /// Payment retries exhausted.
    Unpaid,
}

impl SubscriptionStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::PastDue => "past_due",
            Self::Unpaid => "unpaid",
        }
    }

    /// Map a processor status string into the local status.
    ///
    /// Processor states outside the local vocabulary (trialing, incomplete,
    /// paused) collapse into `Active` or `Canceled` by whether they still
    /// grant access.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "active" | "trialing" => Self::Active,
            "past_due" => Self::PastDue,
            "unpaid" => Self::Unpaid,
            _ => Self::Canceled,
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ledgerly_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "canceled" => Ok(Self::Canceled),
            "past_due" => Ok(Self::PastDue),
            "unpaid" => Ok(Self::Unpaid),
            _ => Err(ledgerly_core::AppError::validation(format!(
                "Invalid subscription status: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_provider() {
        assert_eq!(
            SubscriptionStatus::from_provider("active"),
            SubscriptionStatus::Active
        );
        assert_eq!(
            SubscriptionStatus::from_provider("trialing"),
            SubscriptionStatus::Active
        );
        assert_eq!(
            SubscriptionStatus::from_provider("past_due"),
            SubscriptionStatus::PastDue
        );
        assert_eq!(
            SubscriptionStatus::from_provider("incomplete_expired"),
            SubscriptionStatus::Canceled
        );
    }

    #[test]
    fn test_round_trip() {
        assert_eq!(
            "past_due".parse::<SubscriptionStatus>().unwrap(),
            SubscriptionStatus::PastDue
        );
        assert_eq!(SubscriptionStatus::PastDue.to_string(), "past_due");
    }
}
