//! Session token verification configuration.

use serde::{Deserialize, Serialize};

/// Settings for verifying the identity provider's session tokens.
///
/// The provider signs session JWTs; the application only verifies them and
/// reads the `sub` claim as the caller's subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared with the identity provider's session signing.
    pub session_secret: String,
    /// Clock-skew leeway for token validation, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

fn default_leeway() -> u64 {
    5
}
