//! Budget model
//!
//! A budget is a spending ceiling for one category over one date window,
//! owned by exactly one owner.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, OwnerId};
use super::money::Money;
use super::period::{DateRange, PeriodKind};

/// A spending ceiling for a category over a date window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// The owner this budget belongs to
    pub owner_id: OwnerId,

    /// Category key the budget applies to
    pub category: String,

    /// Ceiling for the window
    pub amount: Money,

    /// Cadence the budget was defined for
    pub period_kind: PeriodKind,

    /// First day of the window
    pub start_date: NaiveDate,

    /// Last day of the window (inclusive)
    pub end_date: NaiveDate,

    /// Inactive budgets are ignored by progress scans and overlap checks
    #[serde(default = "default_active")]
    pub active: bool,

    /// When this budget was created
    pub created_at: DateTime<Utc>,

    /// When this budget was last modified
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Budget {
    /// Materialize a budget from creation data
    pub fn from_new(new: NewBudget) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            owner_id: new.owner_id,
            category: new.category,
            amount: new.amount,
            period_kind: new.period_kind,
            start_date: new.start_date,
            end_date: new.end_date,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn window(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Whether the window ended before `today`
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }

    /// Whether this budget competes with another for the same owner, category and days
    pub fn conflicts_with(&self, other: &Budget) -> bool {
        self.id != other.id
            && self.active
            && other.active
            && self.owner_id == other.owner_id
            && self.category == other.category
            && self.window().overlaps(&other.window())
    }

    /// Apply an edit, bumping `updated_at` when anything changed
    pub fn apply(&mut self, patch: &BudgetPatch) {
        if patch.is_empty() {
            return;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(kind) = patch.period_kind {
            self.period_kind = kind;
        }
        if let Some(start) = patch.start_date {
            self.start_date = start;
        }
        if let Some(end) = patch.end_date {
            self.end_date = end;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Check the window and the amount
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        validate_terms(&self.category, self.amount, self.start_date, self.end_date)
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.category,
            self.amount,
            self.period_kind,
            self.window()
        )?;
        if !self.active {
            write!(f, " (inactive)")?;
        }
        Ok(())
    }
}

/// Data needed to create a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    pub owner_id: OwnerId,
    pub category: String,
    pub amount: Money,
    pub period_kind: PeriodKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewBudget {
    /// Create a budget over an explicit window
    ///
    /// The category key is trimmed so it matches transaction categories.
    pub fn new(
        owner_id: OwnerId,
        category: impl Into<String>,
        amount: Money,
        period_kind: PeriodKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            owner_id,
            category: category.into().trim().to_string(),
            amount,
            period_kind,
            start_date,
            end_date,
        }
    }

    /// Create a budget covering the calendar window of `kind` that contains `anchor`
    pub fn for_period(
        owner_id: OwnerId,
        category: impl Into<String>,
        amount: Money,
        kind: PeriodKind,
        anchor: NaiveDate,
    ) -> Self {
        let window = kind.window_containing(anchor);
        Self::new(owner_id, category, amount, kind, window.start, window.end)
    }

    pub fn window(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        validate_terms(&self.category, self.amount, self.start_date, self.end_date)
    }
}

/// Owner edits to an existing budget; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetPatch {
    pub amount: Option<Money>,
    pub period_kind: Option<PeriodKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub active: Option<bool>,
}

impl BudgetPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.period_kind.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.active.is_none()
    }
}

fn validate_terms(
    category: &str,
    amount: Money,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), BudgetValidationError> {
    if category.trim().is_empty() {
        return Err(BudgetValidationError::EmptyCategory);
    }
    if end < start {
        return Err(BudgetValidationError::EndBeforeStart { start, end });
    }
    if !amount.is_positive() {
        return Err(BudgetValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyCategory,
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    NonPositiveAmount(Money),
}

impl BudgetValidationError {
    /// Whether the error concerns the window or amount rather than other fields
    pub fn is_period_error(&self) -> bool {
        !matches!(self, Self::EmptyCategory)
    }
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "Budget category cannot be empty"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
            Self::NonPositiveAmount(amount) => {
                write!(f, "Budget amount must be positive, got {}", amount)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn august_food() -> NewBudget {
        NewBudget::new(
            OwnerId::new(1),
            "food",
            Money::from_cents(500000),
            PeriodKind::Monthly,
            date(2025, 8, 1),
            date(2025, 8, 31),
        )
    }

    #[test]
    fn test_from_new() {
        let budget = Budget::from_new(august_food());
        assert!(budget.active);
        assert_eq!(budget.category, "food");
        assert_eq!(budget.window().len_days(), 31);
        assert_eq!(budget.created_at, budget.updated_at);
    }

    #[test]
    fn test_category_is_trimmed() {
        let new = NewBudget::new(
            OwnerId::new(1),
            "  food ",
            Money::from_cents(100),
            PeriodKind::Monthly,
            date(2025, 8, 1),
            date(2025, 8, 31),
        );
        assert_eq!(new.category, "food");
    }

    #[test]
    fn test_for_period_derives_window() {
        let new = NewBudget::for_period(
            OwnerId::new(1),
            "fuel",
            Money::from_cents(10000),
            PeriodKind::Weekly,
            date(2025, 8, 13),
        );
        assert_eq!(new.start_date, date(2025, 8, 11));
        assert_eq!(new.end_date, date(2025, 8, 17));
    }

    #[test]
    fn test_validation() {
        assert!(august_food().validate().is_ok());

        let mut reversed = august_food();
        reversed.end_date = date(2025, 7, 31);
        assert!(matches!(
            reversed.validate(),
            Err(BudgetValidationError::EndBeforeStart { .. })
        ));

        let mut zero = august_food();
        zero.amount = Money::zero();
        let err = zero.validate().unwrap_err();
        assert!(err.is_period_error());

        let mut blank = august_food();
        blank.category = "  ".into();
        let err = blank.validate().unwrap_err();
        assert_eq!(err, BudgetValidationError::EmptyCategory);
        assert!(!err.is_period_error());
    }

    #[test]
    fn test_apply_patch() {
        let mut budget = Budget::from_new(august_food());
        let patch = BudgetPatch {
            amount: Some(Money::from_cents(600000)),
            active: Some(false),
            ..Default::default()
        };
        budget.apply(&patch);
        assert_eq!(budget.amount.cents(), 600000);
        assert!(!budget.active);
        assert_eq!(budget.start_date, date(2025, 8, 1));
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut budget = Budget::from_new(august_food());
        let before = budget.clone();
        budget.apply(&BudgetPatch::default());
        assert_eq!(budget, before);
    }

    #[test]
    fn test_conflicts_with() {
        let a = Budget::from_new(august_food());
        let mut b = Budget::from_new(august_food());
        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&a));

        b.category = "rent".into();
        assert!(!a.conflicts_with(&b));

        let mut c = Budget::from_new(august_food());
        c.deactivate();
        assert!(!a.conflicts_with(&c));
    }

    #[test]
    fn test_is_expired() {
        let budget = Budget::from_new(august_food());
        assert!(!budget.is_expired(date(2025, 8, 31)));
        assert!(budget.is_expired(date(2025, 9, 1)));
    }

    #[test]
    fn test_serialization() {
        let budget = Budget::from_new(august_food());
        let json = serde_json::to_string(&budget).unwrap();
        let deserialized: Budget = serde_json::from_str(&json).unwrap();
        assert_eq!(budget, deserialized);
    }
}
