//! Usage gating and the client-facing usage view.

pub mod service;
pub mod store;

pub use service::{GateOutcome, UsageService};
pub use store::{UsageAction, UsageState, UsageStore};
