use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scoping attributes of an order, already validated by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderContext {
    pub vendor_id: Uuid,
    /// Products without a category never match Category rules
    pub category_id: Option<Uuid>,
    pub product_id: Uuid,
    pub amount: Decimal,
}

impl OrderContext {
    pub fn new(vendor_id: Uuid, category_id: Option<Uuid>, product_id: Uuid, amount: Decimal) -> Self {
        Self {
            vendor_id,
            category_id,
            product_id,
            amount,
        }
    }
}
