//! The paid plan catalog.

use ledgerly_core::config::BillingConfig;
use ledgerly_core::traits::CheckoutParams;
use ledgerly_core::{AppError, AppResult};
use ledgerly_entity::Tier;

/// A purchasable monthly plan.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Internal plan identifier.
    pub id: &'static str,
    /// Customer-facing name.
    pub name: &'static str,
    /// Monthly amount in cents, used when no price id is registered.
    pub amount_cents: i64,
    /// ISO currency code.
    pub currency: &'static str,
    /// Model label unlocked by this plan.
    pub model: &'static str,
    /// Tier the plan grants.
    pub tier: Tier,
    /// Pre-registered price id at the processor, if configured.
    pub price_id: Option<String>,
}

/// The fixed set of paid plans, with price ids drawn from configuration.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
}

impl PlanCatalog {
    pub fn new(config: &BillingConfig) -> Self {
        Self {
            plans: vec![
                Plan {
                    id: "basic-helper",
                    name: "Everyday Assistant",
                    amount_cents: 999,
                    currency: "usd",
                    model: "advanced-ai",
                    tier: Tier::Basic,
                    price_id: config.basic_price_id.clone(),
                },
                Plan {
                    id: "elite-advisor",
                    name: "Elite Advisor",
                    amount_cents: 1999,
                    currency: "usd",
                    model: "premium-ai",
                    tier: Tier::Elite,
                    price_id: config.elite_price_id.clone(),
                },
            ],
        }
    }

    /// All plans, in display order.
    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    /// Look up a plan by its identifier.
    pub fn find(&self, plan_id: &str) -> AppResult<&Plan> {
        self.plans
            .iter()
            .find(|p| p.id == plan_id)
            .ok_or_else(|| AppError::validation(format!("Unknown plan: {plan_id}")))
    }

    /// Resolve the tier a plan grants, or an error for unknown plans.
    pub fn tier_for_plan(&self, plan_id: &str) -> AppResult<Tier> {
        self.find(plan_id).map(|p| p.tier)
    }

    /// Resolve the tier that a subscribed price id maps to, for
    /// subscription lifecycle events that carry no plan metadata.
    pub fn tier_for_price(&self, price_id: &str) -> Option<Tier> {
        self.plans
            .iter()
            .find(|p| p.price_id.as_deref() == Some(price_id))
            .map(|p| p.tier)
    }

    /// Build checkout parameters for a plan.
    pub fn checkout_params(
        &self,
        plan_id: &str,
        success_url: String,
        cancel_url: String,
    ) -> AppResult<CheckoutParams> {
        let plan = self.find(plan_id)?;
        Ok(CheckoutParams {
            price_id: plan.price_id.clone(),
            plan_id: plan.id.to_string(),
            plan_name: plan.name.to_string(),
            amount_cents: plan.amount_cents,
            currency: plan.currency.to_string(),
            model: plan.model.to_string(),
            success_url,
            cancel_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BillingConfig {
        BillingConfig {
            api_url: "https://api.stripe.com/v1".into(),
            secret_key: "sk_test".into(),
            webhook_secret: "whsec_test".into(),
            webhook_tolerance_seconds: 300,
            timeout_seconds: 10,
            basic_price_id: Some("price_basic".into()),
            elite_price_id: None,
        }
    }

    #[test]
    fn test_plan_lookup() {
        let catalog = PlanCatalog::new(&config());
        assert_eq!(catalog.tier_for_plan("basic-helper").unwrap(), Tier::Basic);
        assert_eq!(catalog.tier_for_plan("elite-advisor").unwrap(), Tier::Elite);
        assert!(catalog.tier_for_plan("free-forever").is_err());
    }

    #[test]
    fn test_tier_for_price() {
        let catalog = PlanCatalog::new(&config());
        assert_eq!(catalog.tier_for_price("price_basic"), Some(Tier::Basic));
        assert_eq!(catalog.tier_for_price("price_other"), None);
    }

    #[test]
    fn test_checkout_params_carry_metadata() {
        let catalog = PlanCatalog::new(&config());
        let params = catalog
            .checkout_params(
                "elite-advisor",
                "https://app.example.com/ok".into(),
                "https://app.example.com/cancel".into(),
            )
            .unwrap();
        assert_eq!(params.plan_id, "elite-advisor");
        assert_eq!(params.model, "premium-ai");
        assert_eq!(params.amount_cents, 1999);
        // No price id registered for elite in this config.
        assert!(params.price_id.is_none());
    }
}
