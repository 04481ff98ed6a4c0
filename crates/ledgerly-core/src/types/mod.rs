//! Shared domain types.

pub mod limit;

pub use limit::{FREE_QUERY_LIMIT, Limit};
