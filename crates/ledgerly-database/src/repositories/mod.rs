//! sqlx-backed repository implementations.

pub mod entitlement;
pub mod ip_usage;
pub mod subscription_event;
pub mod usage_analytics;

pub use entitlement::EntitlementRepository;
pub use ip_usage::IpUsageRepository;
pub use subscription_event::SubscriptionEventRepository;
pub use usage_analytics::UsageAnalyticsRepository;
