use std::cmp::Ordering;

use commission_core::{CommissionRule, OrderContext};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::calculator::{CalculationError, RateCalculator};
use crate::config::EngineConfig;

/// The winning rule for an order and the commission it produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution<'a> {
    pub rule: &'a CommissionRule,
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("No applicable commission rule for vendor {vendor_id}, product {product_id}, amount {amount}")]
    NoApplicableRule {
        vendor_id: Uuid,
        product_id: Uuid,
        amount: Decimal,
    },

    #[error("Rule {rule_id} could not be applied: {source}")]
    Calculation {
        rule_id: Uuid,
        #[source]
        source: CalculationError,
    },
}

/// Selects exactly one rule per order and prices it.
///
/// Winner ordering, first difference decides:
/// 1. lowest `priority`
/// 2. most specific scope (Product > Category > Vendor > Global)
/// 3. most recent `updated_at`
/// 4. lowest `id`
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleResolver {
    calculator: RateCalculator,
}

impl RuleResolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_calculator(RateCalculator::new(config))
    }

    pub fn with_calculator(calculator: RateCalculator) -> Self {
        Self { calculator }
    }

    pub fn resolve<'a>(
        &self,
        order: &OrderContext,
        rules: &'a [CommissionRule],
    ) -> Result<Resolution<'a>, ResolutionError> {
        let rule = self.select(order, rules).ok_or_else(|| {
            if !rules.iter().any(CommissionRule::is_safety_net) {
                warn!(
                    "Rule catalog of {} rules has no active unbounded Global rule",
                    rules.len()
                );
            }
            ResolutionError::NoApplicableRule {
                vendor_id: order.vendor_id,
                product_id: order.product_id,
                amount: order.amount,
            }
        })?;

        let outcome = self
            .calculator
            .compute(&rule.rate, order.amount)
            .map_err(|source| ResolutionError::Calculation {
                rule_id: rule.id,
                source,
            })?;

        debug!(
            "Resolved rule {} ({}, {} scope, {} rate, priority {}) for amount {}: rate {} amount {}",
            rule.id,
            rule.name,
            rule.scope.name(),
            rule.rate.kind(),
            rule.priority,
            order.amount,
            outcome.effective_rate,
            outcome.commission_amount
        );

        Ok(Resolution {
            rule,
            commission_rate: outcome.effective_rate,
            commission_amount: outcome.commission_amount,
        })
    }

    /// Winning rule without pricing it
    pub fn select<'a>(
        &self,
        order: &OrderContext,
        rules: &'a [CommissionRule],
    ) -> Option<&'a CommissionRule> {
        rules
            .iter()
            .filter(|rule| rule.is_eligible(order))
            .min_by(|a, b| precedence(a, b))
    }
}

/// Every rule the order may be billed under, in catalog order
pub fn eligible_rules<'a>(order: &OrderContext, rules: &'a [CommissionRule]) -> Vec<&'a CommissionRule> {
    rules.iter().filter(|rule| rule.is_eligible(order)).collect()
}

/// `Less` means `a` outranks `b`
fn precedence(a: &CommissionRule, b: &CommissionRule) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| b.scope.specificity().cmp(&a.scope.specificity()))
        .then_with(|| b.updated_at.cmp(&a.updated_at))
        .then_with(|| a.id.cmp(&b.id))
}
