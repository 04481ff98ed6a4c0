//! Anonymous trial counter row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-client trial counters for callers without a session.
///
/// Keyed by the client IP, or by a client fingerprint when the caller
/// supplies one. Unlike entitlement rows, these are never reset.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IpUsage {
    /// Row primary key.
    pub id: Uuid,
    /// Client IP address, or `fp_<fingerprint>` when one was supplied.
    pub ip_address: String,
    /// Trial queries consumed.
    pub query_count: i32,
    /// Trial allowance for this client.
    pub query_limit: i32,
    /// First query from this client.
    pub first_used: DateTime<Utc>,
    /// Most recent query from this client.
    pub last_used: DateTime<Utc>,
}

impl IpUsage {
    /// Consumed queries, clamped at zero.
    pub fn count(&self) -> u32 {
        self.query_count.max(0) as u32
    }

    /// Trial queries left.
    pub fn remaining(&self) -> u32 {
        (self.query_limit - self.query_count).max(0) as u32
    }
}
