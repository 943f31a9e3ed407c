use commission_core::{CommissionTransaction, OrderContext, OrderReference};
use commission_engine::{EngineConfig, ResolutionError, RuleResolver};
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::{CatalogError, RuleCatalog};
use crate::ledger::{LedgerError, TransactionLedger};
use crate::report::CommissionSummary;

/// What happened to a rule on removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleRemoval {
    Deleted,
    /// Kept because transactions reference it
    Archived,
}

/// Turns orders into pending commission transactions against the live catalog
pub struct CommissionService {
    catalog: RuleCatalog,
    ledger: TransactionLedger,
    resolver: RuleResolver,
    currency: String,
}

impl CommissionService {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            catalog: RuleCatalog::new(),
            ledger: TransactionLedger::new(),
            resolver: RuleResolver::new(config),
            currency: config.currency.clone(),
        }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut RuleCatalog {
        &mut self.catalog
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut TransactionLedger {
        &mut self.ledger
    }

    /// Resolve the order against a catalog snapshot and store a pending transaction
    pub fn record_order(
        &mut self,
        reference: OrderReference,
        order: &OrderContext,
    ) -> Result<CommissionTransaction, ServiceError> {
        let rules = self.catalog.snapshot();
        let resolution = self.resolver.resolve(order, &rules).inspect_err(|err| {
            warn!("Commission resolution failed for order {}: {}", reference.order_id, err);
        })?;

        let transaction = CommissionTransaction::pending(
            reference,
            order,
            resolution.rule.id,
            resolution.commission_rate,
            resolution.commission_amount,
            self.currency.clone(),
        );
        self.ledger.record(transaction.clone())?;
        Ok(transaction)
    }

    /// Hard-delete a rule with no history, archive it otherwise
    pub fn remove_rule(&mut self, rule_id: &Uuid) -> Result<RuleRemoval, ServiceError> {
        if self.catalog.get_rule(rule_id).is_none() {
            return Err(CatalogError::NotFound(*rule_id).into());
        }

        if self.ledger.references_rule(rule_id) {
            self.catalog.archive_rule(rule_id)?;
            info!("Rule {} has commission history; archived instead of deleted", rule_id);
            Ok(RuleRemoval::Archived)
        } else {
            self.catalog.delete_rule(rule_id)?;
            Ok(RuleRemoval::Deleted)
        }
    }

    pub fn summary(&self, vendor_id: Option<Uuid>) -> CommissionSummary {
        CommissionSummary::collect(self.ledger.transactions(), vendor_id)
    }
}

impl Default for CommissionService {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
