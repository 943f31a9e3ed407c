pub mod error;
pub mod events;
pub mod order;
pub mod rate;
pub mod rule;
pub mod transaction;

pub use error::{RateSpecError, RuleValidationError};
pub use events::LedgerEvent;
pub use order::OrderContext;
pub use rate::{validate_bands, RateSpec, TierBand};
pub use rule::{CommissionRule, OrderValueBounds, RuleScope};
pub use transaction::{CommissionTransaction, OrderReference, TransactionStatus};
