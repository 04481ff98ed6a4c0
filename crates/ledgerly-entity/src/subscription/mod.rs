//! Subscription views and audit events.

pub mod event;
pub mod snapshot;

pub use event::{NewSubscriptionEvent, SubscriptionEvent};
pub use snapshot::SubscriptionSnapshot;
