use rust_decimal::Decimal;
use uuid::Uuid;

use crate::transaction::TransactionStatus;

/// Ledger changes published to the host for cache invalidation
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    CommissionRecorded {
        transaction_id: Uuid,
        order_id: Uuid,
        vendor_id: Uuid,
        rule_id: Uuid,
        commission_amount: Decimal,
        timestamp: i64,
    },
    StatusChanged {
        transaction_id: Uuid,
        from: TransactionStatus,
        to: TransactionStatus,
        timestamp: i64,
    },
}

impl LedgerEvent {
    pub fn transaction_id(&self) -> Uuid {
        match self {
            LedgerEvent::CommissionRecorded { transaction_id, .. }
            | LedgerEvent::StatusChanged { transaction_id, .. } => *transaction_id,
        }
    }
}
