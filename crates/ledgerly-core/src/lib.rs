//! # ledgerly-core
//!
//! Core crate for Ledgerly. Contains configuration schemas, the unified
//! error system, shared domain types, and the trait seams behind which the
//! external identity and billing providers sit.
//!
//! This crate has **no** internal dependencies on other Ledgerly crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
