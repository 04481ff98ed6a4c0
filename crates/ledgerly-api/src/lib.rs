//! # ledgerly-api
//!
//! HTTP API layer for Ledgerly built on Axum.
//!
//! Provides the REST endpoints, the session-token extractor, DTOs, and
//! the mapping from domain errors to HTTP responses.

pub mod auth;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
