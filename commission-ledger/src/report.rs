use commission_core::{CommissionTransaction, TransactionStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusTotals {
    pub count: usize,
    pub order_amount: Decimal,
    pub commission_amount: Decimal,
}

impl StatusTotals {
    /// Totals saturate at `Decimal::MAX` instead of panicking
    fn add(&mut self, transaction: &CommissionTransaction) {
        self.count = self.count.saturating_add(1);
        self.order_amount = self.order_amount.saturating_add(transaction.order_amount);
        self.commission_amount = self.commission_amount.saturating_add(transaction.commission_amount);
    }
}

/// Commission totals for the admin dashboard, overall and per status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommissionSummary {
    pub vendor_id: Option<Uuid>,
    pub total: StatusTotals,
    pub by_status: BTreeMap<TransactionStatus, StatusTotals>,
}

impl CommissionSummary {
    /// Summarize transactions, optionally restricted to one vendor
    pub fn collect<'a, I>(transactions: I, vendor_id: Option<Uuid>) -> Self
    where
        I: IntoIterator<Item = &'a CommissionTransaction>,
    {
        let mut total = StatusTotals::default();
        let mut by_status: BTreeMap<TransactionStatus, StatusTotals> = BTreeMap::new();

        for transaction in transactions {
            if vendor_id.is_some_and(|vendor| vendor != transaction.vendor_id) {
                continue;
            }
            total.add(transaction);
            by_status.entry(transaction.status).or_default().add(transaction);
        }

        Self {
            vendor_id,
            total,
            by_status,
        }
    }

    pub fn status(&self, status: TransactionStatus) -> StatusTotals {
        self.by_status.get(&status).cloned().unwrap_or_default()
    }

    /// Commission still owed: pending plus disputed
    pub fn outstanding_commission(&self) -> Decimal {
        self.status(TransactionStatus::Pending)
            .commission_amount
            .saturating_add(self.status(TransactionStatus::Disputed).commission_amount)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "vendor_id": self.vendor_id,
            "metrics": {
                "transactions": self.total.count,
                "total_order_amount": self.total.order_amount,
                "total_commission": self.total.commission_amount,
                "paid_commission": self.status(TransactionStatus::Paid).commission_amount,
                "outstanding_commission": self.outstanding_commission(),
            },
            "by_status": self.by_status,
        })
    }
}
