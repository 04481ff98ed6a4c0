//! # ledgerly-database
//!
//! PostgreSQL persistence for Ledgerly: connection pool management, the
//! migration runner, the store trait seams, and the sqlx-backed
//! repositories.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{BillingSync, EntitlementStore, EventLog, TrialStore, UsageLog};
