//! Budget service
//!
//! Owner-facing budget operations: validated writes guarded by the overlap
//! check, lookups, on-demand progress and alert previews.

use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::{SentinelError, SentinelResult};
use crate::models::{
    Alert, AlertThresholds, Budget, BudgetId, BudgetPatch, BudgetProgress,
    BudgetValidationError, NewBudget, OwnerId,
};
use crate::storage::{BudgetStore, Storage, TransactionStore};

use super::alert::AlertEvaluator;
use super::overlap::OverlapValidator;
use super::progress::ProgressCalculator;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
    clock: &'a dyn Clock,
    evaluator: AlertEvaluator,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage, clock: &'a dyn Clock) -> Self {
        Self {
            storage,
            clock,
            evaluator: AlertEvaluator::default(),
        }
    }

    /// Use custom alert thresholds for previews
    pub fn with_thresholds(mut self, thresholds: AlertThresholds) -> Self {
        self.evaluator = AlertEvaluator::new(thresholds);
        self
    }

    fn budgets(&self) -> &dyn BudgetStore {
        &self.storage.budgets
    }

    fn transactions(&self) -> &dyn TransactionStore {
        &self.storage.transactions
    }

    /// Create a budget
    ///
    /// Rejects malformed windows and amounts with `InvalidPeriod` before any
    /// store access, and overlapping windows with `DuplicateBudgetPeriod`.
    pub fn create(&self, mut new: NewBudget) -> SentinelResult<Budget> {
        new.category = new.category.trim().to_string();
        new.validate().map_err(validation_error)?;

        OverlapValidator::new(self.budgets()).validate(
            new.owner_id,
            &new.category,
            new.start_date,
            new.end_date,
            None,
        )?;

        let budget = self.budgets().create(new)?;
        info!(
            budget = %budget.id,
            owner = %budget.owner_id,
            category = %budget.category,
            window = %budget.window(),
            "Created budget"
        );
        Ok(budget)
    }

    /// Apply owner edits to a budget
    ///
    /// The overlap check is skipped when the edited budget ends up inactive.
    pub fn update(
        &self,
        id: BudgetId,
        owner: OwnerId,
        patch: &BudgetPatch,
    ) -> SentinelResult<Budget> {
        let current = self.get(id, owner)?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut candidate = current.clone();
        candidate.apply(patch);
        candidate.validate().map_err(validation_error)?;

        if candidate.active {
            OverlapValidator::new(self.budgets()).validate(
                owner,
                &candidate.category,
                candidate.start_date,
                candidate.end_date,
                Some(id),
            )?;
        }

        let updated = self
            .budgets()
            .update(id, owner, patch)?
            .ok_or_else(|| SentinelError::budget_not_found(id.to_string()))?;

        info!(budget = %id, owner = %owner, "Updated budget");
        Ok(updated)
    }

    /// Stop tracking a budget without deleting it
    pub fn deactivate(&self, id: BudgetId, owner: OwnerId) -> SentinelResult<Budget> {
        let patch = BudgetPatch {
            active: Some(false),
            ..Default::default()
        };
        self.update(id, owner, &patch)
    }

    pub fn delete(&self, id: BudgetId, owner: OwnerId) -> SentinelResult<()> {
        if !self.budgets().delete(id, owner)? {
            return Err(SentinelError::budget_not_found(id.to_string()));
        }
        info!(budget = %id, owner = %owner, "Deleted budget");
        Ok(())
    }

    /// Remove all budgets and transactions of an owner
    ///
    /// Transactions go first. If saving them fails nothing is removed. If the
    /// budget removal fails afterwards the transactions stay deleted.
    /// Returns the number of budgets and transactions removed.
    pub fn delete_owner(&self, owner: OwnerId) -> SentinelResult<(usize, usize)> {
        let snapshot = self.storage.transactions.list_for_owner(owner)?;
        let transactions = self.storage.transactions.delete_for_owner(owner)?;
        if let Err(e) = self.storage.transactions.save() {
            for txn in snapshot {
                self.storage.transactions.insert(txn)?;
            }
            return Err(e);
        }

        let budgets = self.budgets().delete_for_owner(owner)?;

        info!(owner = %owner, budgets, transactions, "Deleted owner data");
        Ok((budgets, transactions))
    }

    /// Get a budget by ID
    pub fn get(&self, id: BudgetId, owner: OwnerId) -> SentinelResult<Budget> {
        self.budgets()
            .get(id, owner)?
            .ok_or_else(|| SentinelError::budget_not_found(id.to_string()))
    }

    /// Find a budget by full ID or short display form (e.g. "bud-1a2b3c4d")
    pub fn find(&self, owner: OwnerId, reference: &str) -> SentinelResult<Budget> {
        self.storage
            .budgets
            .list_for_owner(owner)?
            .into_iter()
            .find(|b| b.id.matches(reference))
            .ok_or_else(|| SentinelError::budget_not_found(reference))
    }

    /// Budgets of an owner, active only unless `include_inactive`
    pub fn list(&self, owner: OwnerId, include_inactive: bool) -> SentinelResult<Vec<Budget>> {
        if include_inactive {
            self.storage.budgets.list_for_owner(owner)
        } else {
            self.budgets().list_active(owner, None)
        }
    }

    /// Progress of one budget over its own window
    pub fn progress(&self, id: BudgetId, owner: OwnerId) -> SentinelResult<BudgetProgress> {
        let budget = self.get(id, owner)?;
        self.progress_of(&budget)
    }

    /// Progress of every active budget of an owner
    pub fn progress_for_owner(&self, owner: OwnerId) -> SentinelResult<Vec<BudgetProgress>> {
        self.budgets()
            .list_active(owner, None)?
            .iter()
            .map(|budget| self.progress_of(budget))
            .collect()
    }

    /// Alerts the owner's active budgets would raise right now
    pub fn alerts_for_owner(&self, owner: OwnerId) -> SentinelResult<Vec<Alert>> {
        Ok(self
            .progress_for_owner(owner)?
            .iter()
            .filter_map(|progress| self.evaluator.evaluate(progress))
            .collect())
    }

    /// Deactivate every budget whose window ended before today
    pub fn sweep_expired(&self) -> SentinelResult<usize> {
        let today = self.clock.today();
        let count = self.budgets().deactivate_expired(today)?;
        debug!(count, %today, "Swept expired budgets");
        Ok(count)
    }

    fn progress_of(&self, budget: &Budget) -> SentinelResult<BudgetProgress> {
        let spent = self.transactions().sum_expenses(
            budget.owner_id,
            &budget.category,
            budget.start_date,
            budget.end_date,
        )?;
        ProgressCalculator::new().calculate(budget, spent, self.clock.now())
    }
}

fn validation_error(err: BudgetValidationError) -> SentinelError {
    if err.is_period_error() {
        SentinelError::InvalidPeriod(err.to_string())
    } else {
        SentinelError::Validation(err.to_string())
    }
}
