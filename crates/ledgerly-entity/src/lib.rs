//! # ledgerly-entity
//!
//! Domain models for Ledgerly: the entitlement record, tiers, subscription
//! snapshots and events, and account export types.

pub mod account;
pub mod entitlement;
pub mod subscription;
pub mod trial;

pub use entitlement::{Entitlement, SubscriptionStatus, Tier};
pub use subscription::{SubscriptionEvent, SubscriptionSnapshot};
pub use trial::IpUsage;
