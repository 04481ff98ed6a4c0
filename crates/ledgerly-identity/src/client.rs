//! Identity provider HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, error};

use ledgerly_core::config::identity::IdentityConfig;
use ledgerly_core::error::AppError;
use ledgerly_core::result::AppResult;
use ledgerly_core::traits::{IdentityProfile, IdentityProvider};

use crate::types::ProviderUser;

/// Client for the identity provider's backend API.
///
/// Read calls are safe but are not retried automatically; deletion is a
/// non-idempotent mutation and must never be retried.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    api_url: String,
    secret_key: String,
}

impl IdentityClient {
    /// Build a client from configuration.
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::configuration(format!("Failed to build identity HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn fetch_user(&self, subject: &str) -> AppResult<IdentityProfile> {
        let url = format!("{}/users/{subject}", self.api_url);
        debug!(subject, "Fetching identity profile");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                error!(subject, error = %e, "Identity provider lookup failed");
                AppError::external(format!("Identity provider request failed: {e}"))
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::not_found("User not found")),
            status if status.is_success() => {
                let user: ProviderUser = response.json().await.map_err(|e| {
                    AppError::external(format!("Invalid identity provider response: {e}"))
                })?;
                Ok(user.into_profile())
            }
            status => {
                error!(subject, %status, "Identity provider lookup failed");
                Err(AppError::external(format!(
                    "Identity provider returned {status}"
                )))
            }
        }
    }

    async fn delete_user(&self, subject: &str) -> AppResult<()> {
        let url = format!("{}/users/{subject}", self.api_url);
        debug!(subject, "Deleting identity provider user");

        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                error!(subject, error = %e, "Identity provider deletion failed");
                AppError::external(format!("Identity provider request failed: {e}"))
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::not_found("User not found")),
            status if status.is_success() => Ok(()),
            status => {
                error!(subject, %status, "Identity provider deletion failed");
                Err(AppError::external(format!(
                    "Identity provider returned {status}"
                )))
            }
        }
    }
}
