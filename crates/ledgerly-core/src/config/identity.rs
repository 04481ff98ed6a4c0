//! Identity provider client configuration.

use serde::{Deserialize, Serialize};

/// Settings for the identity provider's backend API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the provider's backend API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Secret API key for backend calls.
    pub secret_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_url() -> String {
    "https://api.clerk.com/v1".to_string()
}

fn default_timeout() -> u64 {
    10
}
