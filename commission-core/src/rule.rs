use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RuleValidationError;
use crate::order::OrderContext;
use crate::rate::RateSpec;

/// The dimension a rule is anchored to, carrying the ids it targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "targets", rename_all = "snake_case")]
pub enum RuleScope {
    Global,
    Vendor(BTreeSet<Uuid>),
    Category(BTreeSet<Uuid>),
    Product(BTreeSet<Uuid>),
}

impl RuleScope {
    pub fn vendors(ids: impl IntoIterator<Item = Uuid>) -> Self {
        RuleScope::Vendor(ids.into_iter().collect())
    }

    pub fn categories(ids: impl IntoIterator<Item = Uuid>) -> Self {
        RuleScope::Category(ids.into_iter().collect())
    }

    pub fn products(ids: impl IntoIterator<Item = Uuid>) -> Self {
        RuleScope::Product(ids.into_iter().collect())
    }

    /// Product > Category > Vendor > Global
    pub fn specificity(&self) -> u8 {
        match self {
            RuleScope::Global => 0,
            RuleScope::Vendor(_) => 1,
            RuleScope::Category(_) => 2,
            RuleScope::Product(_) => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RuleScope::Global => "Global",
            RuleScope::Vendor(_) => "Vendor",
            RuleScope::Category(_) => "Category",
            RuleScope::Product(_) => "Product",
        }
    }

    pub fn targets(&self) -> Option<&BTreeSet<Uuid>> {
        match self {
            RuleScope::Global => None,
            RuleScope::Vendor(ids) | RuleScope::Category(ids) | RuleScope::Product(ids) => {
                Some(ids)
            }
        }
    }

    pub fn matches(&self, order: &OrderContext) -> bool {
        match self {
            RuleScope::Global => true,
            RuleScope::Vendor(ids) => ids.contains(&order.vendor_id),
            RuleScope::Category(ids) => order
                .category_id
                .map_or(false, |category| ids.contains(&category)),
            RuleScope::Product(ids) => ids.contains(&order.product_id),
        }
    }
}

/// Optional order amount window. Both ends are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderValueBounds {
    #[serde(default)]
    pub min: Option<Decimal>,
    #[serde(default)]
    pub max: Option<Decimal>,
}

impl OrderValueBounds {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, amount: Decimal) -> bool {
        self.min.map_or(true, |min| amount >= min) && self.max.map_or(true, |max| amount <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    fn validate(&self) -> Result<(), RuleValidationError> {
        for (label, value) in [("min", self.min), ("max", self.max)] {
            if let Some(value) = value {
                if value < Decimal::ZERO {
                    return Err(RuleValidationError::InvalidBounds(format!(
                        "{} {} is negative",
                        label, value
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(RuleValidationError::InvalidBounds(format!(
                    "min {} exceeds max {}",
                    min, max
                )));
            }
        }
        Ok(())
    }
}

/// A commission rule as authored by an administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRule {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub scope: RuleScope,
    pub rate: RateSpec,
    pub is_active: bool,
    /// Lower value wins
    pub priority: i32,
    #[serde(default)]
    pub bounds: Option<OrderValueBounds>,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommissionRule {
    pub fn new(name: impl Into<String>, scope: RuleScope, rate: RateSpec, priority: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            scope,
            rate,
            is_active: true,
            priority,
            bounds: None,
            archived_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_bounds(mut self, bounds: OrderValueBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Active, not archived, scope matches and the amount is within bounds
    pub fn is_eligible(&self, order: &OrderContext) -> bool {
        self.is_active
            && !self.is_archived()
            && self.scope.matches(order)
            && self
                .bounds
                .as_ref()
                .map_or(true, |bounds| bounds.contains(order.amount))
    }

    /// Active Global rule with no bounds; guarantees every order resolves
    pub fn is_safety_net(&self) -> bool {
        self.is_active
            && !self.is_archived()
            && self.scope == RuleScope::Global
            && self.bounds.as_ref().map_or(true, OrderValueBounds::is_unbounded)
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.touch();
    }

    pub fn archive(&mut self) {
        let now = Utc::now();
        self.is_active = false;
        self.archived_at = Some(now);
        self.updated_at = now;
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), RuleValidationError> {
        if self.name.trim().is_empty() {
            return Err(RuleValidationError::EmptyName);
        }
        if let Some(targets) = self.scope.targets() {
            if targets.is_empty() {
                return Err(RuleValidationError::EmptyScopeTargets(self.scope.name()));
            }
        }
        if let Some(bounds) = &self.bounds {
            bounds.validate()?;
        }
        self.rate.validate()?;
        Ok(())
    }
}
