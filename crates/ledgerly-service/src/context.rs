//! Request context carrying the authenticated subject.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context for the current authenticated request.
///
/// Extracted from the session token by the HTTP layer and passed into
/// service methods so that every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Identity-provider subject of the caller.
    pub subject: String,
    /// Email claim from the session token, when present.
    pub email: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(subject: String, email: Option<String>) -> Self {
        Self {
            subject,
            email,
            request_time: Utc::now(),
        }
    }

    /// The email to seed a lazily created entitlement row with.
    ///
    /// Falls back to a provider-scoped placeholder when the token carries
    /// no email claim; the webhook sync will fill in the real address.
    pub fn email_or_placeholder(&self) -> String {
        self.email
            .clone()
            .unwrap_or_else(|| format!("{}@unknown.invalid", self.subject))
    }
}
