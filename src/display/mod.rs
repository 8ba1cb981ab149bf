//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for budgets, progress, transactions,
//! alerts and scan reports.

pub mod alert;
pub mod budget;
pub mod transaction;

pub use alert::{format_alert_history, format_alerts, format_scan_report};
pub use budget::{format_budget_details, format_budget_list, format_progress_list};
pub use transaction::format_transaction_list;
