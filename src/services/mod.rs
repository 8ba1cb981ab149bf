//! Service layer for Budget Sentinel
//!
//! The engine pieces (progress, overlap, alert, scan) are pure computation
//! over the store traits. The budget and transaction services wrap them for
//! owner-facing operations on top of [`crate::storage::Storage`].

pub mod alert;
pub mod budget;
pub mod overlap;
pub mod progress;
pub mod scan;
pub mod transaction;

pub use alert::AlertEvaluator;
pub use budget::BudgetService;
pub use overlap::OverlapValidator;
pub use progress::ProgressCalculator;
pub use scan::{BudgetScanner, OwnerFailure, ScanReport};
pub use transaction::{TransactionFilter, TransactionService};
