//! # ledgerly-identity
//!
//! Thin client for the external identity provider's backend API. The
//! application consumes only profile lookup and account deletion; all
//! sign-in/session flows happen at the provider.

pub mod client;
pub mod types;

pub use client::IdentityClient;
