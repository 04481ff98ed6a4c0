//! # ledgerly-service
//!
//! Business logic for Ledgerly. Services are constructed once at startup
//! with their stores and providers injected, then shared behind `Arc` by
//! the HTTP layer. Nothing in this crate touches the network or the
//! database directly.

pub mod account;
pub mod chat;
pub mod context;
pub mod subscription;
pub mod usage;

pub use context::RequestContext;
