//! # ledgerly-billing
//!
//! Payment processor integration: a thin REST client behind the
//! `BillingProvider` trait, the plan catalog that resolves plan
//! identifiers to tiers and limits, and webhook signature verification.

pub mod client;
pub mod plans;
pub mod types;
pub mod webhook;

pub use client::BillingClient;
pub use plans::PlanCatalog;
pub use webhook::{WebhookEvent, verify_signature};
