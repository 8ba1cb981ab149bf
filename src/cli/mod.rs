//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod alerts;
pub mod budget;
pub mod scan;
pub mod transaction;

pub use alerts::{handle_alerts_command, AlertsCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use scan::{handle_scan_command, ScanCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{SentinelError, SentinelResult};
use crate::models::Money;

/// Parse a YYYY-MM-DD date argument
pub(crate) fn parse_date(s: &str) -> SentinelResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| SentinelError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
}

/// Parse an amount argument such as "125" or "125.50"
pub(crate) fn parse_amount(s: &str) -> SentinelResult<Money> {
    Money::parse(s).map_err(|e| SentinelError::Validation(e.to_string()))
}
