//! Account deletion orchestration.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use ledgerly_core::traits::{BillingProvider, IdentityProfile, IdentityProvider};
use ledgerly_core::{AppError, AppResult};
use ledgerly_database::store::EntitlementStore;
use ledgerly_entity::account::{DeletionReceipt, ProfileExport};

use crate::context::RequestContext;

/// Read-only preview of what deletion will remove.
#[derive(Debug, Clone, Serialize)]
pub struct DeletionPreview {
    /// The profile as the identity provider holds it.
    pub profile: IdentityProfile,
    /// Number of active subscriptions that will be canceled.
    pub active_subscriptions: usize,
    /// Whether a local entitlement record exists.
    pub has_entitlement_record: bool,
}

/// Orchestrates full account removal across the identity provider, the
/// payment processor, and local storage.
#[derive(Clone)]
pub struct AccountService {
    entitlements: Arc<dyn EntitlementStore>,
    billing: Arc<dyn BillingProvider>,
    identity: Arc<dyn IdentityProvider>,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        entitlements: Arc<dyn EntitlementStore>,
        billing: Arc<dyn BillingProvider>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            entitlements,
            billing,
            identity,
        }
    }

    /// Delete the caller's account.
    ///
    /// Subscription cancellation and local row removal are best-effort;
    /// deletion at the identity provider is the defining step and its
    /// failure fails the whole operation.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        confirm: bool,
        export: bool,
    ) -> AppResult<DeletionReceipt> {
        if !confirm {
            return Err(AppError::validation(
                "Deletion must be explicitly confirmed",
            ));
        }

        let profile = self.identity.fetch_user(&ctx.subject).await?;
        let export = export.then(|| ProfileExport::from_profile(&profile));

        if let Some(email) = profile.email.as_deref() {
            self.cancel_all_subscriptions(ctx, email).await;
        }

        match self.entitlements.delete_by_subject(&ctx.subject).await {
            Ok(removed) => {
                if removed {
                    info!(subject = %ctx.subject, "Local entitlement record deleted");
                }
            }
            Err(e) => {
                warn!(subject = %ctx.subject, error = %e, "Local record deletion failed");
            }
        }

        self.identity.delete_user(&ctx.subject).await?;
        info!(subject = %ctx.subject, "Account deleted at identity provider");

        Ok(DeletionReceipt {
            export,
            deleted_at: Utc::now(),
        })
    }

    /// Cancel every active subscription for the email, swallowing
    /// failures; the account is going away either way.
    async fn cancel_all_subscriptions(&self, ctx: &RequestContext, email: &str) {
        let customers = match self.billing.customers_by_email(email).await {
            Ok(customers) => customers,
            Err(e) => {
                warn!(subject = %ctx.subject, error = %e, "Customer lookup failed during deletion");
                return;
            }
        };

        for customer in customers {
            let subscriptions = match self.billing.active_subscriptions(&customer.id).await {
                Ok(subscriptions) => subscriptions,
                Err(e) => {
                    warn!(subject = %ctx.subject, error = %e, "Subscription lookup failed during deletion");
                    continue;
                }
            };
            for subscription in subscriptions {
                match self.billing.cancel_subscription(&subscription.id).await {
                    Ok(_) => {
                        info!(subject = %ctx.subject, subscription_id = %subscription.id, "Subscription canceled during deletion");
                    }
                    Err(e) => {
                        warn!(subject = %ctx.subject, subscription_id = %subscription.id, error = %e, "Cancellation failed during deletion");
                    }
                }
            }
        }
    }

    /// Read-only preview for the deletion confirmation screen.
    pub async fn deletion_info(&self, ctx: &RequestContext) -> AppResult<DeletionPreview> {
        let profile = self.identity.fetch_user(&ctx.subject).await?;

        let mut active = 0;
        if let Some(email) = profile.email.as_deref() {
            for customer in self.billing.customers_by_email(email).await? {
                active += self.billing.active_subscriptions(&customer.id).await?.len();
            }
        }

        let has_record = self
            .entitlements
            .find_by_subject(&ctx.subject)
            .await?
            .is_some();

        Ok(DeletionPreview {
            profile,
            active_subscriptions: active,
            has_entitlement_record: has_record,
        })
    }
}
