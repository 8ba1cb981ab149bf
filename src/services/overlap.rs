//! Overlap validator
//!
//! Pre-check run before a budget is created or updated: an owner may hold at
//! most one active budget per category for any given day.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::{SentinelError, SentinelResult};
use crate::models::period::intervals_overlap;
use crate::models::{BudgetId, OwnerId};
use crate::storage::BudgetStore;

/// Rejects budget windows that collide with an existing active budget
pub struct OverlapValidator<'a> {
    budgets: &'a dyn BudgetStore,
}

impl<'a> OverlapValidator<'a> {
    pub fn new(budgets: &'a dyn BudgetStore) -> Self {
        Self { budgets }
    }

    /// Check `[start, end]` against the owner's active budgets in `category`
    ///
    /// `exclude` skips the budget being edited. Windows sharing a single
    /// boundary day conflict. Performs no mutation.
    pub fn validate(
        &self,
        owner: OwnerId,
        category: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude: Option<BudgetId>,
    ) -> SentinelResult<()> {
        let existing = self.budgets.list_active(owner, Some(category))?;

        let conflict = existing
            .iter()
            .filter(|b| Some(b.id) != exclude)
            .find(|b| intervals_overlap(start, end, b.start_date, b.end_date));

        match conflict {
            Some(other) => {
                warn!(
                    owner = %owner,
                    category,
                    %start,
                    %end,
                    existing = %other.id,
                    "Budget window overlaps an active budget"
                );
                Err(SentinelError::DuplicateBudgetPeriod {
                    category: category.to_string(),
                    start,
                    end,
                    existing: other.id,
                })
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, NewBudget, PeriodKind};
    use crate::storage::BudgetRepository;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn repo_with_january() -> (TempDir, BudgetRepository, BudgetId) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        let budget = repo
            .create(NewBudget::new(
                OwnerId::new(1),
                "food",
                Money::from_cents(50_000),
                PeriodKind::Monthly,
                date(2025, 1, 1),
                date(2025, 1, 31),
            ))
            .unwrap();
        (temp_dir, repo, budget.id)
    }

    #[test]
    fn test_shared_boundary_day_conflicts() {
        let (_dir, repo, id) = repo_with_january();
        let validator = OverlapValidator::new(&repo);

        let err = validator
            .validate(OwnerId::new(1), "food", date(2025, 1, 31), date(2025, 2, 27), None)
            .unwrap_err();
        match err {
            SentinelError::DuplicateBudgetPeriod { existing, .. } => assert_eq!(existing, id),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_adjacent_window_is_allowed() {
        let (_dir, repo, _id) = repo_with_january();
        let validator = OverlapValidator::new(&repo);

        assert!(validator
            .validate(OwnerId::new(1), "food", date(2025, 2, 1), date(2025, 2, 28), None)
            .is_ok());
    }

    #[test]
    fn test_other_category_or_owner_is_allowed() {
        let (_dir, repo, _id) = repo_with_january();
        let validator = OverlapValidator::new(&repo);

        assert!(validator
            .validate(OwnerId::new(1), "rent", date(2025, 1, 1), date(2025, 1, 31), None)
            .is_ok());
        assert!(validator
            .validate(OwnerId::new(2), "food", date(2025, 1, 1), date(2025, 1, 31), None)
            .is_ok());
    }

    #[test]
    fn test_excluded_budget_is_skipped() {
        let (_dir, repo, id) = repo_with_january();
        let validator = OverlapValidator::new(&repo);

        assert!(validator
            .validate(OwnerId::new(1), "food", date(2025, 1, 10), date(2025, 1, 20), Some(id))
            .is_ok());
    }

    #[test]
    fn test_inactive_budget_does_not_conflict() {
        let (_dir, repo, id) = repo_with_january();
        let deactivate = crate::models::BudgetPatch {
            active: Some(false),
            ..Default::default()
        };
        repo.update(id, OwnerId::new(1), &deactivate).unwrap();

        let validator = OverlapValidator::new(&repo);
        assert!(validator
            .validate(OwnerId::new(1), "food", date(2025, 1, 1), date(2025, 1, 31), None)
            .is_ok());
    }
}
