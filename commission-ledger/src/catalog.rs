use commission_core::{CommissionRule, RuleValidationError};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// Administrator-maintained set of commission rules
pub struct RuleCatalog {
    rules: HashMap<Uuid, CommissionRule>,
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Validate and store a new rule
    pub fn create_rule(&mut self, rule: CommissionRule) -> Result<&CommissionRule, CatalogError> {
        if self.rules.contains_key(&rule.id) {
            return Err(CatalogError::Duplicate(rule.id));
        }
        rule.validate()?;

        info!("Commission rule created: {} ({})", rule.id, rule.name);
        let id = rule.id;
        Ok(&*self.rules.entry(id).or_insert(rule))
    }

    /// Apply an edit; the result is re-validated before it replaces the stored rule.
    /// Identity and creation time cannot be changed.
    pub fn update_rule<F>(&mut self, rule_id: &Uuid, edit: F) -> Result<&CommissionRule, CatalogError>
    where
        F: FnOnce(&mut CommissionRule),
    {
        let current = self.get_rule_mut(rule_id)?;
        if current.is_archived() {
            return Err(CatalogError::Archived(*rule_id));
        }

        let mut edited = current.clone();
        edit(&mut edited);
        edited.id = current.id;
        edited.created_at = current.created_at;
        edited.archived_at = None;
        edited.validate()?;
        edited.touch();

        *current = edited;
        info!("Commission rule updated: {}", rule_id);
        Ok(&*current)
    }

    /// Status toggle; archived rules stay inactive
    pub fn set_active(&mut self, rule_id: &Uuid, active: bool) -> Result<(), CatalogError> {
        let rule = self.get_rule_mut(rule_id)?;
        if rule.is_archived() {
            return Err(CatalogError::Archived(*rule_id));
        }

        rule.set_active(active);
        info!("Commission rule {} active={}", rule_id, active);
        Ok(())
    }

    pub fn archive_rule(&mut self, rule_id: &Uuid) -> Result<(), CatalogError> {
        let rule = self.get_rule_mut(rule_id)?;
        if rule.is_archived() {
            return Err(CatalogError::Archived(*rule_id));
        }

        rule.archive();
        info!("Commission rule archived: {}", rule_id);
        Ok(())
    }

    /// Hard delete. Callers must check the rule has no transactions first.
    pub(crate) fn delete_rule(&mut self, rule_id: &Uuid) -> Result<CommissionRule, CatalogError> {
        let rule = self
            .rules
            .remove(rule_id)
            .ok_or(CatalogError::NotFound(*rule_id))?;
        info!("Commission rule deleted: {}", rule_id);
        Ok(rule)
    }

    pub fn get_rule(&self, rule_id: &Uuid) -> Option<&CommissionRule> {
        self.rules.get(rule_id)
    }

    /// Immutable copy ordered by id, handed to the resolver
    pub fn snapshot(&self) -> Vec<CommissionRule> {
        let mut rules: Vec<CommissionRule> = self.rules.values().cloned().collect();
        rules.sort_by_key(|rule| rule.id);
        rules
    }

    pub fn has_safety_net(&self) -> bool {
        self.rules.values().any(CommissionRule::is_safety_net)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn get_rule_mut(&mut self, rule_id: &Uuid) -> Result<&mut CommissionRule, CatalogError> {
        self.rules
            .get_mut(rule_id)
            .ok_or(CatalogError::NotFound(*rule_id))
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Commission rule not found: {0}")]
    NotFound(Uuid),

    #[error("Commission rule already exists: {0}")]
    Duplicate(Uuid),

    #[error("Commission rule is archived: {0}")]
    Archived(Uuid),

    #[error("Invalid commission rule: {0}")]
    Invalid(#[from] RuleValidationError),
}
