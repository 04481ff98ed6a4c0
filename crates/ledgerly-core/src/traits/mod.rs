//! Trait seams for external capability providers.
//!
//! The identity and billing providers are consumed through these traits so
//! that services can be exercised against in-memory doubles and so that the
//! HTTP clients stay swappable.

pub mod billing;
pub mod identity;

pub use billing::{
    BillingCustomer, BillingProvider, BillingSubscription, CheckoutParams, CheckoutSession,
};
pub use identity::{IdentityProfile, IdentityProvider};
