//! Subscription lifecycle: cancellation, status, tier updates, and the
//! webhook-driven tier resolver.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use ledgerly_billing::{PlanCatalog, WebhookEvent};
use ledgerly_core::traits::{BillingProvider, BillingSubscription, IdentityProvider};
use ledgerly_core::{AppError, AppResult};
use ledgerly_database::store::{BillingSync, EntitlementStore, EventLog};
use ledgerly_entity::entitlement::NewEntitlement;
use ledgerly_entity::subscription::NewSubscriptionEvent;
use ledgerly_entity::{Entitlement, SubscriptionSnapshot, SubscriptionStatus, Tier};

use crate::context::RequestContext;

/// How a cancellation request should be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelMode {
    /// Cancel outright, ending access now. Older clients send the longer
    /// `immediately` token.
    #[serde(alias = "immediately")]
    Immediate,
    /// Keep access until the paid period runs out.
    PeriodEnd,
}

/// Read-only subscription status for the caller.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Subscriptions that are active or flagged to cancel at period end.
    pub subscriptions: Vec<SubscriptionSnapshot>,
    /// Whether any of them currently grants access.
    pub has_active: bool,
}

/// Owns every path that moves an entitlement between tiers.
#[derive(Clone)]
pub struct SubscriptionService {
    entitlements: Arc<dyn EntitlementStore>,
    events: Arc<dyn EventLog>,
    billing: Arc<dyn BillingProvider>,
    identity: Arc<dyn IdentityProvider>,
    plans: PlanCatalog,
}

impl SubscriptionService {
    /// Creates a new subscription service.
    pub fn new(
        entitlements: Arc<dyn EntitlementStore>,
        events: Arc<dyn EventLog>,
        billing: Arc<dyn BillingProvider>,
        identity: Arc<dyn IdentityProvider>,
        plans: PlanCatalog,
    ) -> Self {
        Self {
            entitlements,
            events,
            billing,
            identity,
            plans,
        }
    }

    /// The caller's email as the identity provider knows it.
    async fn caller_email(&self, ctx: &RequestContext) -> AppResult<String> {
        let profile = self.identity.fetch_user(&ctx.subject).await?;
        profile
            .email
            .ok_or_else(|| AppError::not_found("No email address on record for this account"))
    }

    /// Every active subscription across all of the caller's billing
    /// customer records. Duplicate customers per email are possible and
    /// all of them are inspected.
    async fn list_active(&self, email: &str) -> AppResult<Vec<BillingSubscription>> {
        let mut subscriptions = Vec::new();
        for customer in self.billing.customers_by_email(email).await? {
            subscriptions.extend(self.billing.active_subscriptions(&customer.id).await?);
        }
        Ok(subscriptions)
    }

    /// Cancel the caller's active subscriptions.
    ///
    /// Immediate cancellation also reverts the local record to the free
    /// tier; that revert is best-effort because the processor-side cancel
    /// has already happened and cannot be undone.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        mode: CancelMode,
    ) -> AppResult<Vec<SubscriptionSnapshot>> {
        let email = self.caller_email(ctx).await?;
        let active = self.list_active(&email).await?;

        if active.is_empty() {
            return Err(AppError::not_found("No active subscription found"));
        }

        let mut snapshots = Vec::with_capacity(active.len());
        for subscription in active {
            let processed = match mode {
                CancelMode::Immediate => {
                    self.billing.cancel_subscription(&subscription.id).await?
                }
                CancelMode::PeriodEnd => {
                    self.billing.cancel_at_period_end(&subscription.id).await?
                }
            };
            info!(
                subject = %ctx.subject,
                subscription_id = %processed.id,
                ?mode,
                "Subscription cancellation processed"
            );
            self.record_cancellation(ctx, &processed.id, mode).await;
            snapshots.push(processed.into());
        }

        if mode == CancelMode::Immediate {
            if let Err(e) = self
                .entitlements
                .set_tier(&ctx.subject, Tier::Free, SubscriptionStatus::Canceled, true)
                .await
            {
                warn!(
                    subject = %ctx.subject,
                    error = %e,
                    "Local revert to free tier failed after cancellation"
                );
            }
        }

        Ok(snapshots)
    }

    async fn record_cancellation(&self, ctx: &RequestContext, subscription_id: &str, mode: CancelMode) {
        let record = match self.entitlements.find_by_subject(&ctx.subject).await {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(e) => {
                warn!(subject = %ctx.subject, error = %e, "Event lookup failed");
                return;
            }
        };
        let event = NewSubscriptionEvent::cancellation(
            record.id,
            subscription_id,
            mode == CancelMode::Immediate,
        );
        if let Err(e) = self.events.record(&event).await {
            warn!(subject = %ctx.subject, error = %e, "Cancellation event not recorded");
        }
    }

    /// Read-only view of the caller's subscriptions at the processor.
    pub async fn check_status(&self, ctx: &RequestContext) -> AppResult<StatusReport> {
        let email = self.caller_email(ctx).await?;
        let subscriptions: Vec<SubscriptionSnapshot> = self
            .list_active(&email)
            .await?
            .into_iter()
            .map(SubscriptionSnapshot::from)
            .filter(|s| s.is_active() || s.cancel_at_period_end)
            .collect();
        let has_active = subscriptions.iter().any(SubscriptionSnapshot::is_active);
        Ok(StatusReport {
            subscriptions,
            has_active,
        })
    }

    /// Move the caller's record to a tier.
    ///
    /// Paid tiers lift the limit and start a fresh cycle; a move back to
    /// free restores the free limit but preserves the consumed count.
    pub async fn update_tier(&self, ctx: &RequestContext, tier: Tier) -> AppResult<Entitlement> {
        let new = NewEntitlement::free(&ctx.subject, ctx.email_or_placeholder());
        let before = self.entitlements.get_or_create(&new).await?;

        let record = self
            .entitlements
            .set_tier(&ctx.subject, tier, SubscriptionStatus::Active, tier.is_paid())
            .await?;

        info!(subject = %ctx.subject, from = %before.tier, to = %tier, "Tier updated");
        let event = NewSubscriptionEvent::tier_change(record.id, before.tier, tier);
        if let Err(e) = self.events.record(&event).await {
            warn!(subject = %ctx.subject, error = %e, "Tier-change event not recorded");
        }

        Ok(record)
    }

    /// Create a hosted checkout session for a plan.
    ///
    /// Refused with a conflict when the caller already holds an active
    /// subscription; the check is best-effort against the processor's
    /// current view.
    pub async fn create_checkout(
        &self,
        ctx: &RequestContext,
        plan_id: &str,
        success_url: String,
        cancel_url: String,
    ) -> AppResult<ledgerly_core::traits::CheckoutSession> {
        let params = self.plans.checkout_params(plan_id, success_url, cancel_url)?;

        let email = self.caller_email(ctx).await?;
        let already_subscribed = self
            .list_active(&email)
            .await?
            .iter()
            .any(|s| s.status == "active");
        if already_subscribed {
            return Err(AppError::conflict("An active subscription already exists"));
        }

        let session = self.billing.create_checkout_session(params).await?;
        info!(subject = %ctx.subject, plan_id, session_id = %session.id, "Checkout session created");
        Ok(session)
    }

    /// Apply one verified webhook event.
    ///
    /// Replayed deliveries (same processor event id) are acknowledged
    /// without reprocessing; unhandled event types are logged and ignored.
    pub async fn apply_webhook_event(&self, event: &WebhookEvent) -> AppResult<()> {
        if self.events.seen_provider_event(&event.id).await? {
            info!(event_id = %event.id, "Webhook replay ignored");
            return Ok(());
        }

        match event.event_type.as_str() {
            "checkout.session.completed" => self.apply_checkout_completed(event).await,
            "customer.subscription.updated" => self.apply_subscription_updated(event).await,
            "customer.subscription.deleted" => self.apply_subscription_deleted(event).await,
            other => {
                info!(event_id = %event.id, event_type = other, "Webhook event ignored");
                Ok(())
            }
        }
    }

    async fn apply_checkout_completed(&self, event: &WebhookEvent) -> AppResult<()> {
        let session = event.checkout_session()?;

        let Some(email) = session.email() else {
            warn!(event_id = %event.id, "Checkout session carries no customer email");
            return Ok(());
        };
        let Some(plan_id) = session.plan_id() else {
            warn!(event_id = %event.id, "Checkout session carries no plan metadata");
            return Ok(());
        };
        let tier = self.plans.tier_for_plan(plan_id)?;

        let Some(record) = self.entitlements.find_by_email(email).await? else {
            warn!(event_id = %event.id, email, "Checkout completed for unknown account");
            return Ok(());
        };

        let before = record.tier;
        let updated = self
            .entitlements
            .set_tier(&record.subject, tier, SubscriptionStatus::Active, true)
            .await?;
        self.entitlements
            .sync_billing(
                &record.subject,
                &BillingSync {
                    customer_id: session.customer.clone(),
                    subscription_id: session.subscription.clone(),
                    status: Some(SubscriptionStatus::Active),
                    ..Default::default()
                },
            )
            .await?;

        info!(
            subject = %updated.subject,
            plan_id,
            tier = %tier,
            "Checkout completed; tier granted"
        );
        self.events
            .record(&NewSubscriptionEvent {
                entitlement_id: updated.id,
                event_type: event.event_type.clone(),
                provider_event_id: Some(event.id.clone()),
                old_tier: Some(before),
                new_tier: Some(tier),
                event_data: Some(serde_json::json!({ "plan_id": plan_id })),
            })
            .await
    }

    async fn apply_subscription_updated(&self, event: &WebhookEvent) -> AppResult<()> {
        let wire = event.subscription()?;

        let Some(record) = self
            .entitlements
            .find_by_billing_customer(&wire.customer)
            .await?
        else {
            warn!(event_id = %event.id, customer = %wire.customer, "Subscription update for unknown customer");
            return Ok(());
        };

        let subscription: BillingSubscription = wire.into();
        let status = SubscriptionStatus::from_provider(&subscription.status);
        self.entitlements
            .sync_billing(
                &record.subject,
                &BillingSync {
                    subscription_id: Some(subscription.id.clone()),
                    status: Some(status),
                    period_end: subscription
                        .current_period_end
                        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
                    ..Default::default()
                },
            )
            .await?;

        info!(subject = %record.subject, status = %subscription.status, "Subscription synced");
        self.events
            .record(&NewSubscriptionEvent {
                entitlement_id: record.id,
                event_type: event.event_type.clone(),
                provider_event_id: Some(event.id.clone()),
                old_tier: None,
                new_tier: None,
                event_data: Some(serde_json::json!({
                    "subscription_id": subscription.id,
                    "status": subscription.status,
                })),
            })
            .await
    }

    async fn apply_subscription_deleted(&self, event: &WebhookEvent) -> AppResult<()> {
        let wire = event.subscription()?;

        let Some(record) = self
            .entitlements
            .find_by_billing_customer(&wire.customer)
            .await?
        else {
            warn!(event_id = %event.id, customer = %wire.customer, "Subscription deletion for unknown customer");
            return Ok(());
        };

        let before = record.tier;
        let updated = self
            .entitlements
            .set_tier(
                &record.subject,
                Tier::Free,
                SubscriptionStatus::Canceled,
                true,
            )
            .await?;

        info!(subject = %updated.subject, "Subscription ended; reverted to free tier");
        self.events
            .record(&NewSubscriptionEvent {
                entitlement_id: updated.id,
                event_type: event.event_type.clone(),
                provider_event_id: Some(event.id.clone()),
                old_tier: Some(before),
                new_tier: Some(Tier::Free),
                event_data: Some(serde_json::json!({ "subscription_id": wire.id })),
            })
            .await
    }
}
