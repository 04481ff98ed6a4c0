//! Service tier enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use ledgerly_core::types::Limit;

/// Service tiers, ordered by level of access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Metered access with a small monthly query limit.
    Free,
    /// Paid tier with unlimited queries and the advanced model.
    Basic,
    /// Paid tier with unlimited queries and the premium model.
    Elite,
}

impl Tier {
    /// The monthly query limit this tier entitles.
    pub fn query_limit(&self) -> Limit {
        match self {
            Self::Free => Limit::free(),
            Self::Basic | Self::Elite => Limit::Unlimited,
        }
    }

    /// Whether this is a paid tier.
    pub fn is_paid(&self) -> bool {
        !matches!(self, Self::Free)
    }

    /// The assistant model label served to this tier.
    pub fn model_label(&self) -> &'static str {
        match self {
            Self::Free => "standard-ai",
            Self::Basic => "advanced-ai",
            Self::Elite => "premium-ai",
        }
    }

    /// Return the tier as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Elite => "elite",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ledgerly_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "basic" => Ok(Self::Basic),
            "elite" => Ok(Self::Elite),
            _ => Err(ledgerly_core::AppError::validation(format!(
                "Invalid tier: '{s}'. Expected one of: free, basic, elite"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_limits() {
        assert_eq!(Tier::Free.query_limit(), Limit::free());
        assert_eq!(Tier::Basic.query_limit(), Limit::Unlimited);
        assert_eq!(Tier::Elite.query_limit(), Limit::Unlimited);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("free".parse::<Tier>().unwrap(), Tier::Free);
        assert_eq!("ELITE".parse::<Tier>().unwrap(), Tier::Elite);
        assert!("platinum".parse::<Tier>().is_err());
    }

    #[test]
    fn test_model_labels() {
        assert_eq!(Tier::Free.model_label(), "standard-ai");
        assert_eq!(Tier::Basic.model_label(), "advanced-ai");
        assert_eq!(Tier::Elite.model_label(), "premium-ai");
    }
}
