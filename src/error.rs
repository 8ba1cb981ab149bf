//! Custom error types for Budget Sentinel
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::BudgetId;

/// The main error type for Budget Sentinel operations
#[derive(Error, Debug)]
pub enum SentinelError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for input that is not a budget window
    #[error("Validation error: {0}")]
    Validation(String),

    /// Budget window or amount is malformed (end before start, non-positive amount)
    #[error("Invalid budget period: {0}")]
    InvalidPeriod(String),

    /// An active budget for the same owner and category already covers part of the window
    #[error(
        "A budget for '{category}' already covers part of {start}..{end} (conflicts with {existing})"
    )]
    DuplicateBudgetPeriod {
        category: String,
        start: NaiveDate,
        end: NaiveDate,
        existing: BudgetId,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A progress computation overflowed or produced NaN or infinity
    #[error("Degenerate computation: {0}")]
    ComputationDegenerate(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Scheduler errors
    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

impl SentinelError {
    /// Create a "not found" error for budgets
    ///
    /// Used both when the budget does not exist and when it belongs to
    /// another owner; callers cannot tell the two apart.
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a conflict with existing state
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateBudgetPeriod { .. })
    }

    /// Check if this is a validation error (malformed input)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidPeriod(_))
    }
}

impl From<std::io::Error> for SentinelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SentinelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Budget Sentinel operations
pub type SentinelResult<T> = Result<T, SentinelError>;
