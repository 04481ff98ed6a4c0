//! Subscription lifecycle management.

pub mod service;

pub use service::{CancelMode, StatusReport, SubscriptionService};
