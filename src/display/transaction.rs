//! Transaction display formatting

use crate::models::Transaction;

/// Format a list of transactions as a register
pub fn format_transaction_list(transactions: &[Transaction], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let category_width = transactions
        .iter()
        .map(|t| t.category.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<10}  {:<category_width$}  {:>12}  {}\n",
        "ID",
        "Date",
        "Category",
        "Amount",
        "Memo",
        category_width = category_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<10}  {:-<category_width$}  {:->12}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        category_width = category_width,
    ));

    for txn in transactions {
        output.push_str(&format!(
            "{:<12}  {:<10}  {:<category_width$}  {:>12}  {}\n",
            txn.id.to_string(),
            txn.date.format("%Y-%m-%d").to_string(),
            txn.category,
            txn.signed_amount().format_with_symbol(symbol),
            txn.memo,
            category_width = category_width,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, OwnerId};
    use chrono::NaiveDate;

    #[test]
    fn test_expenses_show_as_outflow() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 3).unwrap();
        let txns = vec![
            Transaction::expense(OwnerId::new(1), "food", Money::from_cents(1250), date)
                .with_memo("market"),
            Transaction::income(OwnerId::new(1), "salary", Money::from_cents(300_000), date),
        ];

        let output = format_transaction_list(&txns, "$");
        assert!(output.contains("-$12.50"));
        assert!(output.contains("$3000.00"));
        assert!(output.contains("market"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_transaction_list(&[], "$"), "No transactions found.");
    }
}
