//! Payment processor client configuration.

use serde::{Deserialize, Serialize};

/// Settings for the payment processor's REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Base URL of the processor's API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Secret API key.
    pub secret_key: String,
    /// Shared secret for webhook signature verification.
    pub webhook_secret: String,
    /// Accepted age of a webhook signature timestamp, in seconds.
    #[serde(default = "default_tolerance")]
    pub webhook_tolerance_seconds: i64,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Pre-registered price id for the basic monthly plan, if any.
    #[serde(default)]
    pub basic_price_id: Option<String>,
    /// Pre-registered price id for the elite monthly plan, if any.
    #[serde(default)]
    pub elite_price_id: Option<String>,
}

fn default_api_url() -> String {
    "https://api.stripe.com/v1".to_string()
}

fn default_tolerance() -> i64 {
    300
}

fn default_timeout() -> u64 {
    10
}
