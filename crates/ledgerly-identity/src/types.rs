//! Wire types for the identity provider's user API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use ledgerly_core::traits::IdentityProfile;

/// One email address record on a provider user.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    /// Address record id.
    pub id: String,
    /// The address itself.
    pub email_address: String,
}

/// A user object as the provider's backend API returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    /// Provider user id.
    pub id: String,
    /// All email addresses on the account.
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    /// Id of the primary email address record.
    pub primary_email_address_id: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Account creation time, milliseconds since the epoch.
    pub created_at: Option<i64>,
    /// Last sign-in time, milliseconds since the epoch.
    pub last_sign_in_at: Option<i64>,
}

impl ProviderUser {
    /// The primary email address, falling back to the first on record.
    pub fn primary_email(&self) -> Option<&str> {
        let by_id = self.primary_email_address_id.as_ref().and_then(|id| {
            self.email_addresses
                .iter()
                .find(|e| &e.id == id)
                .map(|e| e.email_address.as_str())
        });
        by_id.or_else(|| {
            self.email_addresses
                .first()
                .map(|e| e.email_address.as_str())
        })
    }

    /// Convert into the provider-neutral profile.
    pub fn into_profile(self) -> IdentityProfile {
        let email = self.primary_email().map(str::to_string);
        IdentityProfile {
            subject: self.id,
            email,
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: self.created_at.and_then(millis_to_datetime),
            last_sign_in_at: self.last_sign_in_at.and_then(millis_to_datetime),
        }
    }
}

fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}
