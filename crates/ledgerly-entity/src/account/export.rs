//! Profile export bundle and deletion receipt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerly_core::traits::IdentityProfile;

/// Profile fields handed back to the user when they request an export
/// alongside deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileExport {
    /// Identity-provider user id.
    pub subject: String,
    /// Email address.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Account creation time at the provider.
    pub created_at: Option<DateTime<Utc>>,
    /// Last sign-in time at the provider.
    pub last_sign_in_at: Option<DateTime<Utc>>,
    /// When this export was assembled.
    pub exported_at: DateTime<Utc>,
}

impl ProfileExport {
    /// Assemble an export bundle from the provider's profile.
    pub fn from_profile(profile: &IdentityProfile) -> Self {
        Self {
            subject: profile.subject.clone(),
            email: profile.email.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            created_at: profile.created_at,
            last_sign_in_at: profile.last_sign_in_at,
            exported_at: Utc::now(),
        }
    }
}

/// The result of a completed account deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionReceipt {
    /// Export bundle, when requested.
    pub export: Option<ProfileExport>,
    /// When the deletion completed.
    pub deleted_at: DateTime<Utc>,
}
