//! Core data models for Budget Sentinel
//!
//! This module contains the data structures of the budgeting domain: budgets,
//! transactions, derived progress snapshots and alerts.

pub mod alert;
pub mod budget;
pub mod ids;
pub mod money;
pub mod period;
pub mod progress;
pub mod transaction;

pub use alert::{Alert, AlertSeverity, AlertThresholds};
pub use budget::{Budget, BudgetPatch, BudgetValidationError, NewBudget};
pub use ids::{BudgetId, OwnerId, TransactionId};
pub use money::Money;
pub use period::{DateRange, PeriodKind};
pub use progress::BudgetProgress;
pub use transaction::{Transaction, TransactionKind};
