//! In-memory doubles for the store and provider seams.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use ledgerly_core::traits::{
    BillingCustomer, BillingProvider, BillingSubscription, CheckoutParams, CheckoutSession,
    IdentityProfile, IdentityProvider,
};
use ledgerly_core::{AppError, AppResult};
use ledgerly_database::store::{BillingSync, EntitlementStore, EventLog, TrialStore, UsageLog};
use ledgerly_entity::IpUsage;
use ledgerly_entity::entitlement::NewEntitlement;
use ledgerly_entity::subscription::NewSubscriptionEvent;
use ledgerly_entity::{Entitlement, SubscriptionStatus, Tier};

/// Hash-map backed entitlement store with the same conditional-update
/// gate semantics as the SQL implementation.
#[derive(Default)]
pub struct MemoryEntitlements {
    rows: Mutex<HashMap<String, Entitlement>>,
}

impl MemoryEntitlements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: Entitlement) {
        self.rows
            .lock()
            .unwrap()
            .insert(record.subject.clone(), record);
    }

    pub fn get(&self, subject: &str) -> Option<Entitlement> {
        self.rows.lock().unwrap().get(subject).cloned()
    }

    fn materialize(new: &NewEntitlement) -> Entitlement {
        let now = Utc::now();
        Entitlement {
            id: Uuid::new_v4(),
            subject: new.subject.clone(),
            email: new.email.clone(),
            first_name: None,
            last_name: None,
            business_name: None,
            business_type: None,
            tier: new.tier,
            query_count: new.query_count,
            query_limit: new.query_limit,
            status: new.status,
            billing_customer_id: None,
            billing_subscription_id: None,
            current_period_start: None,
            current_period_end: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl EntitlementStore for MemoryEntitlements {
    async fn find_by_subject(&self, subject: &str) -> AppResult<Option<Entitlement>> {
        Ok(self.get(subject))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Entitlement>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|r| r.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_billing_customer(
        &self,
        customer_id: &str,
    ) -> AppResult<Option<Entitlement>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|r| r.billing_customer_id.as_deref() == Some(customer_id))
            .cloned())
    }

    async fn get_or_create(&self, new: &NewEntitlement) -> AppResult<Entitlement> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .entry(new.subject.clone())
            .or_insert_with(|| Self::materialize(new))
            .clone())
    }

    async fn try_consume(&self, subject: &str) -> AppResult<Option<Entitlement>> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(subject) {
            Some(record) if record.query_count < record.query_limit => {
                record.query_count += 1;
                record.updated_at = Utc::now();
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn reset_usage(&self, subject: &str) -> AppResult<Entitlement> {
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .get_mut(subject)
            .ok_or_else(|| AppError::not_found("No entitlement record"))?;
        record.query_count = 0;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn set_tier(
        &self,
        subject: &str,
        tier: Tier,
        status: SubscriptionStatus,
        reset_count: bool,
    ) -> AppResult<Entitlement> {
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .get_mut(subject)
            .ok_or_else(|| AppError::not_found("No entitlement record"))?;
        record.tier = tier;
        record.query_limit = tier.query_limit().to_stored();
        record.status = status;
        if reset_count {
            record.query_count = 0;
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn sync_billing(&self, subject: &str, sync: &BillingSync) -> AppResult<Entitlement> {
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .get_mut(subject)
            .ok_or_else(|| AppError::not_found("No entitlement record"))?;
        if let Some(customer_id) = &sync.customer_id {
            record.billing_customer_id = Some(customer_id.clone());
        }
        if let Some(subscription_id) = &sync.subscription_id {
            record.billing_subscription_id = Some(subscription_id.clone());
        }
        if let Some(status) = sync.status {
            record.status = status;
        }
        if let Some(start) = sync.period_start {
            record.current_period_start = Some(start);
        }
        if let Some(end) = sync.period_end {
            record.current_period_end = Some(end);
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_by_subject(&self, subject: &str) -> AppResult<bool> {
        Ok(self.rows.lock().unwrap().remove(subject).is_some())
    }
}

/// Event log that remembers everything it was handed.
#[derive(Default)]
pub struct MemoryEventLog {
    pub events: Mutex<Vec<NewSubscriptionEvent>>,
    seen: Mutex<HashSet<String>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<NewSubscriptionEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventLog for MemoryEventLog {
    async fn record(&self, event: &NewSubscriptionEvent) -> AppResult<()> {
        if let Some(id) = &event.provider_event_id {
            if !self.seen.lock().unwrap().insert(id.clone()) {
                return Ok(());
            }
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn seen_provider_event(&self, provider_event_id: &str) -> AppResult<bool> {
        Ok(self.seen.lock().unwrap().contains(provider_event_id))
    }
}

/// Usage analytics log that counts calls per day and model.
#[derive(Default)]
pub struct MemoryUsageLog {
    pub queries: Mutex<Vec<(Uuid, NaiveDate, String)>>,
}

impl MemoryUsageLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageLog for MemoryUsageLog {
    async fn record_query(
        &self,
        entitlement_id: Uuid,
        day: NaiveDate,
        model: &str,
    ) -> AppResult<()> {
        self.queries
            .lock()
            .unwrap()
            .push((entitlement_id, day, model.to_string()));
        Ok(())
    }
}

/// Hash-map backed trial counter store with the SQL upsert's semantics.
#[derive(Default)]
pub struct MemoryTrialStore {
    rows: Mutex<HashMap<String, IpUsage>>,
}

impl MemoryTrialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, client_key: &str) -> Option<IpUsage> {
        self.rows.lock().unwrap().get(client_key).cloned()
    }
}

#[async_trait]
impl TrialStore for MemoryTrialStore {
    async fn try_consume(&self, client_key: &str, limit: u32) -> AppResult<Option<IpUsage>> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(client_key) {
            None => {
                let now = Utc::now();
                let row = IpUsage {
                    id: Uuid::new_v4(),
                    ip_address: client_key.to_string(),
                    query_count: 1,
                    query_limit: limit as i32,
                    first_used: now,
                    last_used: now,
                };
                rows.insert(client_key.to_string(), row.clone());
                Ok(Some(row))
            }
            Some(row) if row.query_count < row.query_limit => {
                row.query_count += 1;
                row.last_used = Utc::now();
                Ok(Some(row.clone()))
            }
            Some(_) => Ok(None),
        }
    }

    async fn find(&self, client_key: &str) -> AppResult<Option<IpUsage>> {
        Ok(self.rows.lock().unwrap().get(client_key).cloned())
    }
}

/// Scripted billing provider.
#[derive(Default)]
pub struct FakeBilling {
    pub customers: Mutex<Vec<BillingCustomer>>,
    pub subscriptions: Mutex<HashMap<String, Vec<BillingSubscription>>>,
    pub canceled: Mutex<Vec<String>>,
    pub flagged: Mutex<Vec<String>>,
    pub fail_cancel: bool,
}

impl FakeBilling {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscription(self, email: &str, customer_id: &str, sub_id: &str) -> Self {
        self.customers.lock().unwrap().push(BillingCustomer {
            id: customer_id.to_string(),
            email: Some(email.to_string()),
        });
        self.subscriptions.lock().unwrap().entry(customer_id.to_string()).or_default().push(
            BillingSubscription {
                id: sub_id.to_string(),
                customer_id: customer_id.to_string(),
                status: "active".to_string(),
                cancel_at_period_end: false,
                current_period_end: Some(1_735_689_600),
                canceled_at: None,
                price_id: Some("price_basic".to_string()),
            },
        );
        self
    }
}

#[async_trait]
impl BillingProvider for FakeBilling {
    async fn customers_by_email(&self, email: &str) -> AppResult<Vec<BillingCustomer>> {
        Ok(self
            .customers
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.email.as_deref() == Some(email))
            .cloned()
            .collect())
    }

    async fn active_subscriptions(
        &self,
        customer_id: &str,
    ) -> AppResult<Vec<BillingSubscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .get(customer_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> AppResult<BillingSubscription> {
        if self.fail_cancel {
            return Err(AppError::external("Payment processor unavailable"));
        }
        self.canceled
            .lock()
            .unwrap()
            .push(subscription_id.to_string());
        Ok(BillingSubscription {
            id: subscription_id.to_string(),
            customer_id: "cus_any".to_string(),
            status: "canceled".to_string(),
            cancel_at_period_end: false,
            current_period_end: Some(1_735_689_600),
            canceled_at: Some(1_735_000_000),
            price_id: None,
        })
    }

    async fn cancel_at_period_end(
        &self,
        subscription_id: &str,
    ) -> AppResult<BillingSubscription> {
        self.flagged
            .lock()
            .unwrap()
            .push(subscription_id.to_string());
        Ok(BillingSubscription {
            id: subscription_id.to_string(),
            customer_id: "cus_any".to_string(),
            status: "active".to_string(),
            cancel_at_period_end: true,
            current_period_end: Some(1_735_689_600),
            canceled_at: None,
            price_id: None,
        })
    }

    async fn create_checkout_session(
        &self,
        params: CheckoutParams,
    ) -> AppResult<CheckoutSession> {
        Ok(CheckoutSession {
            id: format!("cs_{}", params.plan_id),
            url: "https://pay.example.com/cs_test".to_string(),
        })
    }
}

/// Scripted identity provider.
pub struct FakeIdentity {
    pub profile: IdentityProfile,
    pub deleted: Mutex<Vec<String>>,
    pub missing: bool,
}

impl FakeIdentity {
    pub fn new(subject: &str, email: &str) -> Self {
        Self {
            profile: IdentityProfile {
                subject: subject.to_string(),
                email: Some(email.to_string()),
                first_name: Some("Alex".to_string()),
                last_name: Some("Rivera".to_string()),
                created_at: Some(Utc::now()),
                last_sign_in_at: Some(Utc::now()),
            },
            deleted: Mutex::new(Vec::new()),
            missing: false,
        }
    }

    pub fn missing(subject: &str) -> Self {
        let mut fake = Self::new(subject, "gone@example.com");
        fake.missing = true;
        fake
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn fetch_user(&self, subject: &str) -> AppResult<IdentityProfile> {
        if self.missing || subject != self.profile.subject {
            return Err(AppError::not_found("User not found"));
        }
        Ok(self.profile.clone())
    }

    async fn delete_user(&self, subject: &str) -> AppResult<()> {
        if self.missing {
            return Err(AppError::not_found("User not found"));
        }
        self.deleted.lock().unwrap().push(subject.to_string());
        Ok(())
    }
}
