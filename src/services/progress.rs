//! Progress calculator
//!
//! Turns a budget, the spending matched against it and a point in time into a
//! [`BudgetProgress`] snapshot. Pure: no store access, no clock reads.

use chrono::NaiveDateTime;

use crate::error::{SentinelError, SentinelResult};
use crate::models::period::{days_elapsed, days_remaining};
use crate::models::{Budget, BudgetProgress, Money};

/// Computes spending progress for budgets
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressCalculator;

impl ProgressCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compute the progress of `budget` given `spent` at `now`
    ///
    /// A zero budget amount yields a percentage of 0 rather than a division by
    /// zero. Any NaN or infinite result is returned as
    /// [`SentinelError::ComputationDegenerate`].
    pub fn calculate(
        &self,
        budget: &Budget,
        spent: Money,
        now: NaiveDateTime,
    ) -> SentinelResult<BudgetProgress> {
        let amount = budget.amount;
        let remaining = Money::from_cents(amount.cents().saturating_sub(spent.cents()));

        let percentage_used = if amount.is_positive() {
            spent.as_f64() / amount.as_f64() * 100.0
        } else {
            0.0
        };

        let elapsed = days_elapsed(budget.start_date, now);
        let left = days_remaining(budget.end_date, now);

        let daily_average = spent.as_f64() / elapsed as f64;
        let projected = daily_average * (elapsed + left) as f64;

        let progress = BudgetProgress {
            budget: budget.clone(),
            spent_amount: spent,
            remaining_amount: remaining,
            percentage_used,
            days_elapsed: elapsed,
            days_remaining: left,
            daily_average_spending: daily_average,
            projected_spending: projected,
            is_over_budget: spent > amount,
            is_on_track: projected <= amount.as_f64(),
        };

        let degenerate = progress.non_finite_fields();
        if !degenerate.is_empty() {
            return Err(SentinelError::ComputationDegenerate(format!(
                "budget {} produced non-finite {}",
                budget.id,
                degenerate.join(", ")
            )));
        }

        Ok(progress)
    }
}
