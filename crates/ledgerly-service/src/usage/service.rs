//! The usage gate.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use ledgerly_core::AppResult;
use ledgerly_database::store::EntitlementStore;
use ledgerly_entity::Entitlement;
use ledgerly_entity::entitlement::NewEntitlement;

use crate::context::RequestContext;

/// The result of one pass through the usage gate.
#[derive(Debug, Clone, Serialize)]
pub struct GateOutcome {
    /// Whether the query was admitted.
    pub allowed: bool,
    /// Queries consumed this cycle, after this call.
    pub query_count: u32,
    /// The stored limit.
    pub query_limit: i32,
    /// Queries remaining this cycle.
    pub remaining: u32,
    /// The record the outcome was computed from.
    #[serde(skip)]
    pub entitlement: Entitlement,
}

impl GateOutcome {
    fn denied(entitlement: Entitlement) -> Self {
        Self {
            allowed: false,
            query_count: entitlement.count(),
            query_limit: entitlement.query_limit,
            remaining: 0,
            entitlement,
        }
    }

    fn admitted(entitlement: Entitlement) -> Self {
        Self {
            allowed: true,
            query_count: entitlement.count(),
            query_limit: entitlement.query_limit,
            remaining: entitlement.remaining(),
            entitlement,
        }
    }
}

/// Gates queries against the per-cycle limit and owns usage resets.
#[derive(Clone)]
pub struct UsageService {
    entitlements: Arc<dyn EntitlementStore>,
}

impl UsageService {
    /// Creates a new usage service.
    pub fn new(entitlements: Arc<dyn EntitlementStore>) -> Self {
        Self { entitlements }
    }

    /// Return the caller's entitlement record, creating the free-tier row
    /// on first contact.
    pub async fn current(&self, ctx: &RequestContext) -> AppResult<Entitlement> {
        let new = NewEntitlement::free(&ctx.subject, ctx.email_or_placeholder());
        self.entitlements.get_or_create(&new).await
    }

    /// Admit or deny one query.
    ///
    /// The increment is a single conditional update in the store, so two
    /// concurrent calls racing over the last remaining query resolve to
    /// exactly one admit and one deny.
    pub async fn check_and_consume(&self, ctx: &RequestContext) -> AppResult<GateOutcome> {
        let record = self.current(ctx).await?;

        if !record.permits_query() {
            debug!(
                subject = %ctx.subject,
                count = record.query_count,
                limit = record.query_limit,
                "Query denied: limit reached"
            );
            return Ok(GateOutcome::denied(record));
        }

        match self.entitlements.try_consume(&ctx.subject).await? {
            Some(updated) => Ok(GateOutcome::admitted(updated)),
            // Lost a race for the final slot between the read and the
            // conditional update.
            None => {
                debug!(subject = %ctx.subject, "Query denied: lost race for final slot");
                Ok(GateOutcome::denied(record))
            }
        }
    }

    /// Set the caller's query count back to zero.
    pub async fn reset(&self, ctx: &RequestContext) -> AppResult<Entitlement> {
        self.current(ctx).await?;
        let record = self.entitlements.reset_usage(&ctx.subject).await?;
        info!(subject = %ctx.subject, "Usage counter reset");
        Ok(record)
    }
}
