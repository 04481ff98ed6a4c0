//! Client-side usage view state.
//!
//! A plain state struct plus an action reducer. Instances are owned by
//! whoever needs one; there is no process-global store.

use serde::{Deserialize, Serialize};

use ledgerly_core::types::{FREE_QUERY_LIMIT, Limit};
use ledgerly_entity::{SubscriptionStatus, Tier};

use ledgerly_core::traits::IdentityProfile;

/// Usage counters as the view layer displays them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageView {
    /// Queries consumed this cycle.
    pub query_count: u32,
    /// The active limit.
    pub query_limit: Limit,
    /// Queries remaining this cycle.
    pub remaining: u32,
    /// Whether the caller must authenticate before querying.
    pub requires_auth: bool,
}

/// Subscription fields as the view layer displays them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionView {
    /// Current tier.
    pub tier: Tier,
    /// Lifecycle status, once known.
    pub status: Option<SubscriptionStatus>,
}

/// The full view state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageState {
    /// The signed-in profile, once loaded.
    pub profile: Option<IdentityProfile>,
    /// Whether a load is in flight.
    pub is_loading: bool,
    /// Usage counters.
    pub usage: UsageView,
    /// Subscription fields.
    pub subscription: SubscriptionView,
}

impl Default for UsageState {
    fn default() -> Self {
        Self {
            profile: None,
            is_loading: false,
            usage: UsageView {
                query_count: 0,
                query_limit: Limit::free(),
                remaining: FREE_QUERY_LIMIT,
                requires_auth: false,
            },
            subscription: SubscriptionView {
                tier: Tier::Free,
                status: None,
            },
        }
    }
}

/// State transitions the view layer can apply.
#[derive(Debug, Clone)]
pub enum UsageAction {
    /// Set or clear the loaded profile.
    SetProfile(Option<IdentityProfile>),
    /// Mark a load as started or finished.
    SetLoading(bool),
    /// Replace the usage counters from a server response.
    UpdateUsage {
        query_count: u32,
        query_limit: Limit,
        requires_auth: bool,
    },
    /// Replace the subscription fields from a server response.
    UpdateSubscription {
        tier: Tier,
        status: Option<SubscriptionStatus>,
    },
    /// Optimistically count one query before the server confirms.
    IncrementQueryCount,
    /// Restore the defaults, e.g. on sign-out.
    Reset,
}

/// Holds a [`UsageState`] and applies actions to it.
#[derive(Debug, Clone, Default)]
pub struct UsageStore {
    state: UsageState,
}

impl UsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> &UsageState {
        &self.state
    }

    /// Apply one action.
    ///
    /// `remaining` is recomputed on every counter change, so it always
    /// equals `limit - count` saturated at zero.
    pub fn dispatch(&mut self, action: UsageAction) {
        match action {
            UsageAction::SetProfile(profile) => {
                self.state.profile = profile;
            }
            UsageAction::SetLoading(loading) => {
                self.state.is_loading = loading;
            }
            UsageAction::UpdateUsage {
                query_count,
                query_limit,
                requires_auth,
            } => {
                self.state.usage = UsageView {
                    query_count,
                    query_limit,
                    remaining: query_limit.remaining(query_count),
                    requires_auth,
                };
            }
            UsageAction::UpdateSubscription { tier, status } => {
                self.state.subscription = SubscriptionView { tier, status };
            }
            UsageAction::IncrementQueryCount => {
                let usage = &mut self.state.usage;
                usage.query_count += 1;
                usage.remaining = usage.query_limit.remaining(usage.query_count);
            }
            UsageAction::Reset => {
                self.state = UsageState::default();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let store = UsageStore::new();
        assert_eq!(store.state().usage.query_count, 0);
        assert_eq!(store.state().usage.query_limit, Limit::free());
        assert_eq!(store.state().usage.remaining, FREE_QUERY_LIMIT);
        assert_eq!(store.state().subscription.tier, Tier::Free);
        assert!(store.state().subscription.status.is_none());
    }

    #[test]
    fn test_update_usage_recomputes_remaining() {
        let mut store = UsageStore::new();
        store.dispatch(UsageAction::UpdateUsage {
            query_count: 7,
            query_limit: Limit::Finite(10),
            requires_auth: false,
        });
        assert_eq!(store.state().usage.remaining, 3);

        // A count past the limit saturates at zero.
        store.dispatch(UsageAction::UpdateUsage {
            query_count: 14,
            query_limit: Limit::Finite(10),
            requires_auth: true,
        });
        assert_eq!(store.state().usage.remaining, 0);
        assert!(store.state().usage.requires_auth);
    }

    #[test]
    fn test_optimistic_increment() {
        let mut store = UsageStore::new();
        store.dispatch(UsageAction::UpdateUsage {
            query_count: 9,
            query_limit: Limit::Finite(10),
            requires_auth: false,
        });
        store.dispatch(UsageAction::IncrementQueryCount);
        assert_eq!(store.state().usage.query_count, 10);
        assert_eq!(store.state().usage.remaining, 0);

        // Incrementing past the limit keeps remaining pinned at zero.
        store.dispatch(UsageAction::IncrementQueryCount);
        assert_eq!(store.state().usage.remaining, 0);
    }

    #[test]
    fn test_unlimited_never_runs_out() {
        let mut store = UsageStore::new();
        store.dispatch(UsageAction::UpdateUsage {
            query_count: 5_000,
            query_limit: Limit::Unlimited,
            requires_auth: false,
        });
        store.dispatch(UsageAction::IncrementQueryCount);
        assert!(store.state().usage.remaining > 0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = UsageStore::new();
        store.dispatch(UsageAction::SetLoading(true));
        store.dispatch(UsageAction::UpdateSubscription {
            tier: Tier::Elite,
            status: Some(SubscriptionStatus::Active),
        });
        store.dispatch(UsageAction::Reset);
        assert_eq!(*store.state(), UsageState::default());
    }
}
