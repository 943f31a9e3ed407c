use chrono::Utc;
use commission_core::{CommissionTransaction, LedgerEvent, TransactionStatus};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// Holds commission transactions and drives their status lifecycle
pub struct TransactionLedger {
    transactions: HashMap<Uuid, CommissionTransaction>,
    by_order: HashMap<Uuid, Uuid>,
    events: Vec<LedgerEvent>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self {
            transactions: HashMap::new(),
            by_order: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Store a freshly resolved transaction. One transaction per order.
    pub fn record(&mut self, transaction: CommissionTransaction) -> Result<&CommissionTransaction, LedgerError> {
        if transaction.status != TransactionStatus::Pending {
            return Err(LedgerError::NotPending(transaction.status));
        }
        if self.transactions.contains_key(&transaction.id) {
            return Err(LedgerError::DuplicateTransaction(transaction.id));
        }
        if self.by_order.contains_key(&transaction.order_id) {
            return Err(LedgerError::DuplicateOrder(transaction.order_id));
        }

        info!(
            "Commission recorded: {} for order {} ({} {})",
            transaction.id, transaction.order_id, transaction.commission_amount, transaction.currency
        );
        self.events.push(LedgerEvent::CommissionRecorded {
            transaction_id: transaction.id,
            order_id: transaction.order_id,
            vendor_id: transaction.vendor_id,
            rule_id: transaction.rule_id,
            commission_amount: transaction.commission_amount,
            timestamp: Utc::now().timestamp(),
        });

        let id = transaction.id;
        self.by_order.insert(transaction.order_id, id);
        Ok(&*self.transactions.entry(id).or_insert(transaction))
    }

    /// Transition: Pending | Disputed → Paid
    pub fn mark_paid(&mut self, transaction_id: &Uuid) -> Result<(), LedgerError> {
        self.transition(transaction_id, TransactionStatus::Paid)
    }

    /// Transition: Pending → Disputed
    pub fn dispute(&mut self, transaction_id: &Uuid) -> Result<(), LedgerError> {
        self.transition(transaction_id, TransactionStatus::Disputed)
    }

    /// Transition: Pending | Disputed → Cancelled
    pub fn cancel(&mut self, transaction_id: &Uuid) -> Result<(), LedgerError> {
        self.transition(transaction_id, TransactionStatus::Cancelled)
    }

    pub fn get_transaction(&self, transaction_id: &Uuid) -> Option<&CommissionTransaction> {
        self.transactions.get(transaction_id)
    }

    pub fn find_by_order(&self, order_id: &Uuid) -> Option<&CommissionTransaction> {
        self.by_order
            .get(order_id)
            .and_then(|id| self.transactions.get(id))
    }

    pub fn transactions(&self) -> impl Iterator<Item = &CommissionTransaction> {
        self.transactions.values()
    }

    /// Rules with history must be archived, never deleted
    pub fn references_rule(&self, rule_id: &Uuid) -> bool {
        self.transactions.values().any(|t| t.rule_id == *rule_id)
    }

    /// Hand pending events to the host
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    fn transition(&mut self, transaction_id: &Uuid, to: TransactionStatus) -> Result<(), LedgerError> {
        let transaction = self
            .transactions
            .get_mut(transaction_id)
            .ok_or(LedgerError::NotFound(*transaction_id))?;

        let from = transaction.status;
        if !from.can_transition_to(to) {
            return Err(LedgerError::InvalidTransition { from, to });
        }

        transaction.update_status(to);
        info!("Commission {} moved {} -> {}", transaction_id, from, to);
        self.events.push(LedgerEvent::StatusChanged {
            transaction_id: *transaction_id,
            from,
            to,
            timestamp: transaction.updated_at.timestamp(),
        });
        Ok(())
    }
}

impl Default for TransactionLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Commission transaction not found: {0}")]
    NotFound(Uuid),

    #[error("Commission transaction already exists: {0}")]
    DuplicateTransaction(Uuid),

    #[error("Order {0} already has a commission transaction")]
    DuplicateOrder(Uuid),

    #[error("New transactions must be pending, got {0}")]
    NotPending(TransactionStatus),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: TransactionStatus,
        to: TransactionStatus,
    },
}
