//! Identity provider seam.
//!
//! Authentication itself is delegated to the external identity provider;
//! the application only needs profile lookup by subject and account
//! deletion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Profile fields the identity provider holds for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityProfile {
    /// The provider's opaque user id.
    pub subject: String,
    /// Primary email address, if any.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// When the account was created at the provider.
    pub created_at: Option<DateTime<Utc>>,
    /// Last sign-in time recorded by the provider.
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

/// Operations consumed from the external identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Fetch the profile for a subject.
    ///
    /// Returns `ErrorKind::NotFound` if the provider no longer knows the
    /// subject.
    async fn fetch_user(&self, subject: &str) -> AppResult<IdentityProfile>;

    /// Permanently delete the user at the provider.
    ///
    /// This is the defining step of account deletion; failures must not be
    /// swallowed by callers.
    async fn delete_user(&self, subject: &str) -> AppResult<()>;
}
