//! Cancellation, tier updates, checkout, and webhook-driven changes.

mod support;

use std::sync::Arc;

use ledgerly_billing::{PlanCatalog, WebhookEvent};
use ledgerly_core::config::BillingConfig;
use ledgerly_core::error::ErrorKind;
use ledgerly_core::types::FREE_QUERY_LIMIT;
use ledgerly_database::store::EntitlementStore;
use ledgerly_entity::{SubscriptionStatus, Tier};
use ledgerly_service::RequestContext;
use ledgerly_service::subscription::{CancelMode, SubscriptionService};

use support::{FakeBilling, FakeIdentity, MemoryEntitlements, MemoryEventLog};

fn billing_config() -> BillingConfig {
    BillingConfig {
        api_url: "https://api.stripe.com/v1".into(),
        secret_key: "sk_test".into(),
        webhook_secret: "whsec_test".into(),
        webhook_tolerance_seconds: 300,
        timeout_seconds: 10,
        basic_price_id: Some("price_basic".into()),
        elite_price_id: Some("price_elite".into()),
    }
}

struct Harness {
    store: Arc<MemoryEntitlements>,
    events: Arc<MemoryEventLog>,
    billing: Arc<FakeBilling>,
    service: SubscriptionService,
}

fn harness(billing: FakeBilling, identity: FakeIdentity) -> Harness {
    let store = Arc::new(MemoryEntitlements::new());
    let events = Arc::new(MemoryEventLog::new());
    let billing = Arc::new(billing);
    let service = SubscriptionService::new(
        store.clone(),
        events.clone(),
        billing.clone(),
        Arc::new(identity),
        PlanCatalog::new(&billing_config()),
    );
    Harness {
        store,
        events,
        billing,
        service,
    }
}

fn ctx() -> RequestContext {
    RequestContext::new("user_1".into(), Some("owner@example.com".into()))
}

async fn seed_paid_record(store: &Arc<MemoryEntitlements>, customer_id: &str) {
    let new = ledgerly_entity::entitlement::NewEntitlement::free("user_1", "owner@example.com");
    store.get_or_create(&new).await.unwrap();
    store
        .set_tier("user_1", Tier::Basic, SubscriptionStatus::Active, true)
        .await
        .unwrap();
    store
        .sync_billing(
            "user_1",
            &ledgerly_database::store::BillingSync {
                customer_id: Some(customer_id.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn immediate_cancel_processes_and_reverts_local_record() {
    let h = harness(
        FakeBilling::new().with_subscription("owner@example.com", "cus_1", "sub_1"),
        FakeIdentity::new("user_1", "owner@example.com"),
    );
    seed_paid_record(&h.store, "cus_1").await;

    let snapshots = h.service.cancel(&ctx(), CancelMode::Immediate).await.unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(h.billing.canceled.lock().unwrap().as_slice(), ["sub_1"]);

    let record = h.store.get("user_1").unwrap();
    assert_eq!(record.tier, Tier::Free);
    assert_eq!(record.status, SubscriptionStatus::Canceled);
    assert_eq!(record.query_count, 0);
    assert_eq!(record.query_limit, FREE_QUERY_LIMIT as i32);

    let events = h.events.recorded();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "subscription_canceled");
}

#[tokio::test]
async fn period_end_cancel_leaves_local_record_untouched() {
    let h = harness(
        FakeBilling::new().with_subscription("owner@example.com", "cus_1", "sub_1"),
        FakeIdentity::new("user_1", "owner@example.com"),
    );
    seed_paid_record(&h.store, "cus_1").await;

    let snapshots = h.service.cancel(&ctx(), CancelMode::PeriodEnd).await.unwrap();
    assert!(snapshots[0].cancel_at_period_end);
    assert_eq!(h.billing.flagged.lock().unwrap().as_slice(), ["sub_1"]);

    let record = h.store.get("user_1").unwrap();
    assert_eq!(record.tier, Tier::Basic);
    assert_eq!(record.status, SubscriptionStatus::Active);
}

#[tokio::test]
async fn cancel_spans_every_customer_record_for_the_email() {
    let billing = FakeBilling::new()
        .with_subscription("owner@example.com", "cus_1", "sub_1")
        .with_subscription("owner@example.com", "cus_2", "sub_2");
    let h = harness(billing, FakeIdentity::new("user_1", "owner@example.com"));
    seed_paid_record(&h.store, "cus_1").await;

    let snapshots = h.service.cancel(&ctx(), CancelMode::Immediate).await.unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(h.billing.canceled.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn cancel_without_subscriptions_is_not_found() {
    let h = harness(
        FakeBilling::new(),
        FakeIdentity::new("user_1", "owner@example.com"),
    );

    let err = h.service.cancel(&ctx(), CancelMode::Immediate).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn processor_failure_surfaces_without_local_mutation() {
    let mut billing =
        FakeBilling::new().with_subscription("owner@example.com", "cus_1", "sub_1");
    billing.fail_cancel = true;
    let h = harness(billing, FakeIdentity::new("user_1", "owner@example.com"));
    seed_paid_record(&h.store, "cus_1").await;

    let err = h.service.cancel(&ctx(), CancelMode::Immediate).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);

    let record = h.store.get("user_1").unwrap();
    assert_eq!(record.tier, Tier::Basic);
    assert_eq!(record.status, SubscriptionStatus::Active);
}

#[tokio::test]
async fn status_reports_active_and_flagged_subscriptions() {
    let h = harness(
        FakeBilling::new().with_subscription("owner@example.com", "cus_1", "sub_1"),
        FakeIdentity::new("user_1", "owner@example.com"),
    );

    let report = h.service.check_status(&ctx()).await.unwrap();
    assert!(report.has_active);
    assert_eq!(report.subscriptions.len(), 1);

    // Status checks never touch local state.
    assert!(h.store.get("user_1").is_none());
}

#[tokio::test]
async fn tier_upgrade_lifts_limit_and_resets_count() {
    let h = harness(
        FakeBilling::new(),
        FakeIdentity::new("user_1", "owner@example.com"),
    );
    let new = ledgerly_entity::entitlement::NewEntitlement::free("user_1", "owner@example.com");
    h.store.get_or_create(&new).await.unwrap();
    for _ in 0..3 {
        h.store.try_consume("user_1").await.unwrap();
    }

    let record = h.service.update_tier(&ctx(), Tier::Elite).await.unwrap();
    assert_eq!(record.tier, Tier::Elite);
    assert!(record.limit().is_unlimited());
    assert_eq!(record.query_count, 0);
    assert_eq!(record.status, SubscriptionStatus::Active);

    let events = h.events.recorded();
    assert_eq!(events[0].event_type, "tier_updated");
    assert_eq!(events[0].old_tier, Some(Tier::Free));
    assert_eq!(events[0].new_tier, Some(Tier::Elite));
}

#[tokio::test]
async fn downgrade_to_free_preserves_the_count() {
    let h = harness(
        FakeBilling::new(),
        FakeIdentity::new("user_1", "owner@example.com"),
    );
    let new = ledgerly_entity::entitlement::NewEntitlement::free("user_1", "owner@example.com");
    h.store.get_or_create(&new).await.unwrap();
    for _ in 0..5 {
        h.store.try_consume("user_1").await.unwrap();
    }
    h.service.update_tier(&ctx(), Tier::Elite).await.unwrap();
    // Simulate usage under the paid tier.
    for _ in 0..2 {
        h.store.try_consume("user_1").await.unwrap();
    }

    let record = h.service.update_tier(&ctx(), Tier::Free).await.unwrap();
    assert_eq!(record.tier, Tier::Free);
    assert_eq!(record.query_limit, FREE_QUERY_LIMIT as i32);
    assert_eq!(record.query_count, 2);
}

#[tokio::test]
async fn checkout_conflicts_when_already_subscribed() {
    let h = harness(
        FakeBilling::new().with_subscription("owner@example.com", "cus_1", "sub_1"),
        FakeIdentity::new("user_1", "owner@example.com"),
    );

    let err = h
        .service
        .create_checkout(
            &ctx(),
            "basic-helper",
            "https://app.example.com/ok".into(),
            "https://app.example.com/cancel".into(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn checkout_rejects_unknown_plans_before_any_lookup() {
    let h = harness(
        FakeBilling::new(),
        FakeIdentity::new("user_1", "owner@example.com"),
    );

    let err = h
        .service
        .create_checkout(
            &ctx(),
            "mystery-plan",
            "https://a.example.com".into(),
            "https://b.example.com".into(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn checkout_returns_the_hosted_session() {
    let h = harness(
        FakeBilling::new(),
        FakeIdentity::new("user_1", "owner@example.com"),
    );

    let session = h
        .service
        .create_checkout(
            &ctx(),
            "elite-advisor",
            "https://a.example.com".into(),
            "https://b.example.com".into(),
        )
        .await
        .unwrap();
    assert_eq!(session.id, "cs_elite-advisor");
    assert!(session.url.starts_with("https://"));
}

fn checkout_event(event_id: &str) -> WebhookEvent {
    let body = serde_json::json!({
        "id": event_id,
        "type": "checkout.session.completed",
        "data": { "object": {
            "customer": "cus_9",
            "subscription": "sub_9",
            "customer_details": { "email": "owner@example.com" },
            "metadata": { "planId": "elite-advisor", "model": "premium-ai" }
        }}
    });
    WebhookEvent::parse(body.to_string().as_bytes()).unwrap()
}

#[tokio::test]
async fn checkout_completed_grants_the_purchased_tier() {
    let h = harness(
        FakeBilling::new(),
        FakeIdentity::new("user_1", "owner@example.com"),
    );
    let new = ledgerly_entity::entitlement::NewEntitlement::free("user_1", "owner@example.com");
    h.store.get_or_create(&new).await.unwrap();

    h.service
        .apply_webhook_event(&checkout_event("evt_1"))
        .await
        .unwrap();

    let record = h.store.get("user_1").unwrap();
    assert_eq!(record.tier, Tier::Elite);
    assert!(record.limit().is_unlimited());
    assert_eq!(record.query_count, 0);
    assert_eq!(record.billing_customer_id.as_deref(), Some("cus_9"));
    assert_eq!(record.billing_subscription_id.as_deref(), Some("sub_9"));
}

#[tokio::test]
async fn replayed_webhook_events_are_applied_once() {
    let h = harness(
        FakeBilling::new(),
        FakeIdentity::new("user_1", "owner@example.com"),
    );
    let new = ledgerly_entity::entitlement::NewEntitlement::free("user_1", "owner@example.com");
    h.store.get_or_create(&new).await.unwrap();

    h.service
        .apply_webhook_event(&checkout_event("evt_dup"))
        .await
        .unwrap();
    h.store
        .set_tier("user_1", Tier::Free, SubscriptionStatus::Active, false)
        .await
        .unwrap();

    // Second delivery of the same event id must be a no-op.
    h.service
        .apply_webhook_event(&checkout_event("evt_dup"))
        .await
        .unwrap();
    assert_eq!(h.store.get("user_1").unwrap().tier, Tier::Free);
    assert_eq!(h.events.recorded().len(), 1);
}

#[tokio::test]
async fn subscription_deleted_reverts_to_free() {
    let h = harness(
        FakeBilling::new(),
        FakeIdentity::new("user_1", "owner@example.com"),
    );
    seed_paid_record(&h.store, "cus_1").await;

    let body = serde_json::json!({
        "id": "evt_del",
        "type": "customer.subscription.deleted",
        "data": { "object": {
            "id": "sub_1",
            "customer": "cus_1",
            "status": "canceled",
            "canceled_at": 1_735_000_000
        }}
    });
    let event = WebhookEvent::parse(body.to_string().as_bytes()).unwrap();
    h.service.apply_webhook_event(&event).await.unwrap();

    let record = h.store.get("user_1").unwrap();
    assert_eq!(record.tier, Tier::Free);
    assert_eq!(record.status, SubscriptionStatus::Canceled);
    assert_eq!(record.query_limit, FREE_QUERY_LIMIT as i32);
}

#[tokio::test]
async fn subscription_updated_syncs_status() {
    let h = harness(
        FakeBilling::new(),
        FakeIdentity::new("user_1", "owner@example.com"),
    );
    seed_paid_record(&h.store, "cus_1").await;

    let body = serde_json::json!({
        "id": "evt_upd",
        "type": "customer.subscription.updated",
        "data": { "object": {
            "id": "sub_1",
            "customer": "cus_1",
            "status": "past_due",
            "current_period_end": 1_735_689_600
        }}
    });
    let event = WebhookEvent::parse(body.to_string().as_bytes()).unwrap();
    h.service.apply_webhook_event(&event).await.unwrap();

    let record = h.store.get("user_1").unwrap();
    assert_eq!(record.status, SubscriptionStatus::PastDue);
    assert!(record.current_period_end.is_some());
    // The tier itself is untouched by a bare status sync.
    assert_eq!(record.tier, Tier::Basic);
}
