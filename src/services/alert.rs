//! Alert evaluator

use crate::models::{Alert, AlertSeverity, AlertThresholds, BudgetProgress};

/// Decides whether a progress snapshot warrants an alert
///
/// Stateless: the same progress always yields the same decision, so a scan
/// that runs every day re-alerts every day while a budget stays above a
/// threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertEvaluator {
    thresholds: AlertThresholds,
}

impl AlertEvaluator {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Critical at or above the critical threshold, warning at or above the
    /// warning threshold, otherwise nothing
    pub fn evaluate(&self, progress: &BudgetProgress) -> Option<Alert> {
        evaluate(progress, &self.thresholds)
    }
}

/// Evaluate `progress` against explicit thresholds
pub fn evaluate(progress: &BudgetProgress, thresholds: &AlertThresholds) -> Option<Alert> {
    let pct = progress.percentage_used;

    let severity = if pct >= thresholds.critical {
        AlertSeverity::Critical
    } else if pct >= thresholds.warning {
        AlertSeverity::Warning
    } else {
        return None;
    };

    let budget = &progress.budget;
    let message = match severity {
        AlertSeverity::Critical => format!(
            "Budget for '{}' is at {:.1}% ({} of {}), {} days remaining",
            budget.category, pct, progress.spent_amount, budget.amount, progress.days_remaining
        ),
        AlertSeverity::Warning => format!(
            "Budget for '{}' is at {:.1}% ({} of {}), {} left for {} days",
            budget.category,
            pct,
            progress.spent_amount,
            budget.amount,
            progress.remaining_amount,
            progress.days_remaining
        ),
    };

    Some(Alert {
        budget_id: budget.id,
        owner_id: budget.owner_id,
        category: budget.category.clone(),
        severity,
        percentage_used: pct,
        days_remaining: progress.days_remaining,
        message,
    })
}
