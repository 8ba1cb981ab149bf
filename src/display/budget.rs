//! Budget display formatting
//!
//! Formats budgets and their progress for terminal output in table and detail
//! views.

use crate::models::{Budget, BudgetProgress};

/// Format a list of budgets as a table
pub fn format_budget_list(budgets: &[Budget], symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }

    let category_width = budgets
        .iter()
        .map(|b| b.category.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<category_width$}  {:>12}  {:<7}  {:<22}  {}\n",
        "ID",
        "Category",
        "Amount",
        "Period",
        "Window",
        "Status",
        category_width = category_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<category_width$}  {:->12}  {:-<7}  {:-<22}  {:-<8}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        category_width = category_width,
    ));

    for budget in budgets {
        output.push_str(&format!(
            "{:<12}  {:<category_width$}  {:>12}  {:<7}  {:<22}  {}\n",
            budget.id.to_string(),
            budget.category,
            budget.amount.format_with_symbol(symbol),
            budget.period_kind.to_string(),
            budget.window().to_string(),
            if budget.active { "active" } else { "inactive" },
            category_width = category_width,
        ));
    }

    output
}

/// Format one budget with its progress
pub fn format_budget_details(progress: &BudgetProgress, symbol: &str) -> String {
    let budget = &progress.budget;
    let mut output = String::new();

    output.push_str(&format!("Budget: {}\n", budget.category));
    output.push_str(&format!("  ID:         {}\n", budget.id));
    output.push_str(&format!("  Period:     {} ({})\n", budget.window(), budget.period_kind));
    output.push_str(&format!(
        "  Status:     {}\n",
        if budget.active { "active" } else { "inactive" }
    ));
    output.push_str(&format!("  Amount:     {}\n", budget.amount.format_with_symbol(symbol)));
    output.push_str(&format!(
        "  Spent:      {} ({:.1}%)\n",
        progress.spent_amount.format_with_symbol(symbol),
        progress.percentage_used
    ));
    output.push_str(&format!(
        "  Remaining:  {}\n",
        progress.remaining_amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Days:       {} elapsed, {} remaining\n",
        progress.days_elapsed, progress.days_remaining
    ));
    output.push_str(&format!(
        "  Daily avg:  {}\n",
        progress.daily_average_money().format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Projected:  {}\n",
        progress.projected_money().format_with_symbol(symbol)
    ));
    output.push_str(&format!("  Outlook:    {}\n", outlook(progress)));

    output
}

/// Format progress of several budgets as a table
pub fn format_progress_list(progress: &[BudgetProgress], symbol: &str) -> String {
    if progress.is_empty() {
        return "No active budgets.".to_string();
    }

    let category_width = progress
        .iter()
        .map(|p| p.budget.category.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<category_width$}  {:>12}  {:>12}  {:>7}  {:>9}  {:>12}  {}\n",
        "Category",
        "Spent",
        "Budget",
        "Used",
        "Days left",
        "Projected",
        "Outlook",
        category_width = category_width,
    ));
    output.push_str(&format!(
        "{:-<category_width$}  {:->12}  {:->12}  {:->7}  {:->9}  {:->12}  {:-<12}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        category_width = category_width,
    ));

    for p in progress {
        output.push_str(&format!(
            "{:<category_width$}  {:>12}  {:>12}  {:>6.1}%  {:>9}  {:>12}  {}\n",
            p.budget.category,
            p.spent_amount.format_with_symbol(symbol),
            p.budget.amount.format_with_symbol(symbol),
            p.percentage_used,
            p.days_remaining,
            p.projected_money().format_with_symbol(symbol),
            outlook(p),
            category_width = category_width,
        ));
    }

    output
}

fn outlook(progress: &BudgetProgress) -> &'static str {
    if progress.is_over_budget {
        "over budget"
    } else if progress.is_on_track {
        "on track"
    } else {
        "trending over"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, NewBudget, OwnerId, PeriodKind};
    use crate::services::ProgressCalculator;
    use chrono::NaiveDate;

    fn progress(spent: i64) -> BudgetProgress {
        let budget = Budget::from_new(NewBudget::for_period(
            OwnerId::new(1),
            "groceries",
            Money::from_cents(500_000),
            PeriodKind::Monthly,
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        ));
        let now = NaiveDate::from_ymd_opt(2025, 8, 16)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        ProgressCalculator::new()
            .calculate(&budget, Money::from_cents(spent), now)
            .unwrap()
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_budget_list(&[], "$"), "No budgets found.");
        assert_eq!(format_progress_list(&[], "$"), "No active budgets.");
    }

    #[test]
    fn test_budget_list_shows_window() {
        let p = progress(0);
        let output = format_budget_list(&[p.budget], "€");
        assert!(output.contains("groceries"));
        assert!(output.contains("€5000.00"));
        assert!(output.contains("2025-08-01..2025-08-31"));
        assert!(output.contains("active"));
    }

    #[test]
    fn test_details_show_projection() {
        let output = format_budget_details(&progress(300_000), "$");
        assert!(output.contains("$3000.00 (60.0%)"));
        assert!(output.contains("16 elapsed, 15 remaining"));
        assert!(output.contains("$187.50"));
        assert!(output.contains("$5812.50"));
        assert!(output.contains("trending over"));
    }

    #[test]
    fn test_progress_outlook() {
        let output = format_progress_list(&[progress(100_000), progress(600_000)], "$");
        assert!(output.contains("on track"));
        assert!(output.contains("over budget"));
    }
}
