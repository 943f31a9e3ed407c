use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::order::OrderContext;

/// Commission transaction status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Paid,
    Disputed,
    Cancelled,
}

impl TransactionStatus {
    /// pending -> paid | disputed | cancelled, disputed -> paid | cancelled
    pub fn can_transition_to(self, next: TransactionStatus) -> bool {
        use TransactionStatus::*;
        matches!(
            (self, next),
            (Pending, Paid) | (Pending, Disputed) | (Pending, Cancelled) | (Disputed, Paid) | (Disputed, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TransactionStatus::Paid | TransactionStatus::Cancelled)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Paid => "paid",
            TransactionStatus::Disputed => "disputed",
            TransactionStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Identifiers of the order a commission is charged against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReference {
    pub order_id: Uuid,
    pub customer_id: Uuid,
}

/// One commission record per order, produced at resolution time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionTransaction {
    pub id: Uuid,
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub vendor_id: Uuid,
    pub product_id: Uuid,
    pub category_id: Option<Uuid>,
    pub order_amount: Decimal,
    pub rule_id: Uuid,
    /// Effective rate; for tiered rules the band rate that applied
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
    pub currency: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommissionTransaction {
    pub fn pending(
        reference: OrderReference,
        order: &OrderContext,
        rule_id: Uuid,
        commission_rate: Decimal,
        commission_amount: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            order_id: reference.order_id,
            customer_id: reference.customer_id,
            vendor_id: order.vendor_id,
            product_id: order.product_id,
            category_id: order.category_id,
            order_amount: order.amount,
            rule_id,
            commission_rate,
            commission_amount,
            currency: currency.into(),
            status: TransactionStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update status without checking the transition
    pub fn update_status(&mut self, new_status: TransactionStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }
}
