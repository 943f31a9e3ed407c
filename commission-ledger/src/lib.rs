pub mod catalog;
pub mod ledger;
pub mod report;
pub mod service;

pub use catalog::{CatalogError, RuleCatalog};
pub use ledger::{LedgerError, TransactionLedger};
pub use report::{CommissionSummary, StatusTotals};
pub use service::{CommissionService, RuleRemoval, ServiceError};
