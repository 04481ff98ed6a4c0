//! Entitlement record and its enumerations.

pub mod model;
pub mod status;
pub mod tier;

pub use model::{Entitlement, NewEntitlement};
pub use status::SubscriptionStatus;
pub use tier::Tier;
