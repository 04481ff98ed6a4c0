//! Query limit type.
//!
//! The database stores limits in a plain integer column, with a large
//! sentinel standing in for "unlimited". In code the limit is a tagged
//! variant so that no arithmetic is ever performed on the sentinel; the
//! sentinel exists only at the storage boundary.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical monthly query limit for the free tier.
pub const FREE_QUERY_LIMIT: u32 = 10;

/// Stored integer representing an unlimited quota.
const UNLIMITED_SENTINEL: i32 = 999_999;

/// A per-cycle query limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    /// A bounded number of queries per cycle.
    Finite(u32),
    /// No quota; paid tiers.
    Unlimited,
}

impl Limit {
    /// The free-tier limit.
    pub fn free() -> Self {
        Self::Finite(FREE_QUERY_LIMIT)
    }

    /// Whether another query is permitted at the given consumed count.
    pub fn permits(&self, count: u32) -> bool {
        match self {
            Self::Finite(limit) => count < *limit,
            Self::Unlimited => true,
        }
    }

    /// Queries remaining at the given consumed count, saturating at zero.
    ///
    /// `Unlimited` reports the stored sentinel's worth of headroom so that
    /// callers always get a plain integer to display.
    pub fn remaining(&self, count: u32) -> u32 {
        match self {
            Self::Finite(limit) => limit.saturating_sub(count),
            Self::Unlimited => UNLIMITED_SENTINEL as u32,
        }
    }

    /// Decode from the stored integer column.
    pub fn from_stored(value: i32) -> Self {
        if value >= UNLIMITED_SENTINEL {
            Self::Unlimited
        } else {
            Self::Finite(value.max(0) as u32)
        }
    }

    /// Encode for the stored integer column.
    pub fn to_stored(&self) -> i32 {
        match self {
            Self::Finite(limit) => *limit as i32,
            Self::Unlimited => UNLIMITED_SENTINEL,
        }
    }

    /// Whether this limit is unlimited.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(limit) => write!(f, "{limit}"),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}

// On the wire the limit is the same integer the original clients expect.
impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.to_stored())
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i32::deserialize(deserializer)?;
        Ok(Self::from_stored(value))
    }
}
