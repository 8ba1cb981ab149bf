//! Budget progress snapshot
//!
//! Derived on every read from a budget and its matched spending. Never
//! persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::budget::Budget;
use super::money::Money;

/// Spending progress of one budget at a point in time
///
/// Money values are in cents. `daily_average_spending` and
/// `projected_spending` are fractional cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    pub budget: Budget,
    pub spent_amount: Money,
    pub remaining_amount: Money,
    pub percentage_used: f64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    pub daily_average_spending: f64,
    pub projected_spending: f64,
    pub is_over_budget: bool,
    pub is_on_track: bool,
}

impl BudgetProgress {
    /// Names of float fields holding NaN or infinity, if any
    pub fn non_finite_fields(&self) -> Vec<&'static str> {
        [
            ("percentage_used", self.percentage_used),
            ("daily_average_spending", self.daily_average_spending),
            ("projected_spending", self.projected_spending),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_finite())
        .map(|(name, _)| name)
        .collect()
    }

    /// Projected spend rounded to whole cents
    pub fn projected_money(&self) -> Money {
        Money::from_cents(self.projected_spending.round() as i64)
    }

    /// Daily average rounded to whole cents
    pub fn daily_average_money(&self) -> Money {
        Money::from_cents(self.daily_average_spending.round() as i64)
    }
}

impl fmt::Display for BudgetProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: spent {} of {} ({:.1}%), {} left, {} days remaining",
            self.budget.category,
            self.spent_amount,
            self.budget.amount,
            self.percentage_used,
            self.remaining_amount,
            self.days_remaining
        )
    }
}
