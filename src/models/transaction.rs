//! Transaction model
//!
//! Income and expense records. The budget engine only ever sums expense
//! amounts; it never edits transactions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{OwnerId, TransactionId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(format!("Unknown transaction kind: {}", other)),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The owner this transaction belongs to
    pub owner_id: OwnerId,

    /// Category key
    pub category: String,

    /// Income or expense
    #[serde(default)]
    pub kind: TransactionKind,

    /// Unsigned amount; the sign comes from `kind`
    pub amount: Money,

    /// Transaction date
    pub date: NaiveDate,

    /// Memo/notes
    #[serde(default)]
    pub memo: String,

    /// When the transaction was recorded
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        owner_id: OwnerId,
        category: impl Into<String>,
        kind: TransactionKind,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            owner_id,
            category: category.into(),
            kind,
            amount,
            date,
            memo: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Create an expense
    pub fn expense(
        owner_id: OwnerId,
        category: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self::new(owner_id, category, TransactionKind::Expense, amount, date)
    }

    /// Create an income record
    pub fn income(
        owner_id: OwnerId,
        category: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self::new(owner_id, category, TransactionKind::Income, amount, date)
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount signed by kind: negative for expenses
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// Whether this expense counts toward a category budget over `[from, to]`
    pub fn counts_toward(&self, category: &str, from: NaiveDate, to: NaiveDate) -> bool {
        self.is_expense() && self.category == category && self.date >= from && self.date <= to
    }

    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::EmptyCategory);
        }
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.category,
            self.signed_amount(),
            self.memo
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyCategory,
    NonPositiveAmount(Money),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "Transaction category cannot be empty"),
            Self::NonPositiveAmount(amount) => write!(
                f,
                "Transaction amount must be positive (use the kind for direction), got {}",
                amount
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_signed_amount() {
        let owner = OwnerId::new(1);
        let spent = Transaction::expense(owner, "food", Money::from_cents(1200), date(2025, 8, 2));
        let paid = Transaction::income(owner, "salary", Money::from_cents(9000), date(2025, 8, 2));
        assert_eq!(spent.signed_amount().cents(), -1200);
        assert_eq!(paid.signed_amount().cents(), 9000);
    }

    #[test]
    fn test_counts_toward() {
        let owner = OwnerId::new(1);
        let txn = Transaction::expense(owner, "food", Money::from_cents(1200), date(2025, 8, 31));
        assert!(txn.counts_toward("food", date(2025, 8, 1), date(2025, 8, 31)));
        assert!(!txn.counts_toward("food", date(2025, 9, 1), date(2025, 9, 30)));
        assert!(!txn.counts_toward("rent", date(2025, 8, 1), date(2025, 8, 31)));

        let refund = Transaction::income(owner, "food", Money::from_cents(500), date(2025, 8, 3));
        assert!(!refund.counts_toward("food", date(2025, 8, 1), date(2025, 8, 31)));
    }

    #[test]
    fn test_validation() {
        let owner = OwnerId::new(1);
        let ok = Transaction::expense(owner, "food", Money::from_cents(1), date(2025, 8, 1));
        assert!(ok.validate().is_ok());

        let zero = Transaction::expense(owner, "food", Money::zero(), date(2025, 8, 1));
        assert!(matches!(
            zero.validate(),
            Err(TransactionValidationError::NonPositiveAmount(_))
        ));

        let blank = Transaction::expense(owner, "", Money::from_cents(1), date(2025, 8, 1));
        assert_eq!(
            blank.validate(),
            Err(TransactionValidationError::EmptyCategory)
        );
    }

    #[test]
    fn test_kind_parse_and_default() {
        assert_eq!("Income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert_eq!(TransactionKind::default(), TransactionKind::Expense);
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_serialization() {
        let txn = Transaction::expense(
            OwnerId::new(7),
            "food",
            Money::from_cents(1234),
            date(2025, 8, 2),
        )
        .with_memo("groceries");
        let json = serde_json::to_string(&txn).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(txn, deserialized);
    }
}
