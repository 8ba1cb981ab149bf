//! Budget repository for JSON storage
//!
//! Manages loading and saving budgets to budgets.json. Every mutation is
//! written through to disk while the write lock is held, and the overlap
//! exclusion for active budgets is enforced here as well as in the service
//! layer, so two writers cannot both slip an overlapping budget in.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::error::{SentinelError, SentinelResult};
use crate::models::{Budget, BudgetId, BudgetPatch, NewBudget, OwnerId};

use super::file_io::{read_json, write_json_atomic};
use super::BudgetStore;

/// Serializable budget file layout
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<HashMap<BudgetId, Budget>>,
}

impl BudgetRepository {
    /// Create a new budget repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk
    pub fn load(&self) -> SentinelResult<()> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut budgets = self.write()?;
        budgets.clear();
        for budget in file_data.budgets {
            budgets.insert(budget.id, budget);
        }

        Ok(())
    }

    /// Save budgets to disk
    pub fn save(&self) -> SentinelResult<()> {
        let budgets = self.read()?;
        self.persist(&budgets)
    }

    /// All budgets of an owner, active or not, ordered by category then start date
    pub fn list_for_owner(&self, owner: OwnerId) -> SentinelResult<Vec<Budget>> {
        let budgets = self.read()?;
        let mut list: Vec<_> = budgets
            .values()
            .filter(|b| b.owner_id == owner)
            .cloned()
            .collect();
        sort_budgets(&mut list);
        Ok(list)
    }

    pub fn count(&self) -> SentinelResult<usize> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> SentinelResult<RwLockReadGuard<'_, HashMap<BudgetId, Budget>>> {
        self.budgets
            .read()
            .map_err(|e| SentinelError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> SentinelResult<RwLockWriteGuard<'_, HashMap<BudgetId, Budget>>> {
        self.budgets
            .write()
            .map_err(|e| SentinelError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn persist(&self, budgets: &HashMap<BudgetId, Budget>) -> SentinelResult<()> {
        let mut list: Vec<_> = budgets.values().cloned().collect();
        list.sort_by(|a, b| {
            a.owner_id
                .cmp(&b.owner_id)
                .then_with(|| a.category.cmp(&b.category))
                .then_with(|| a.start_date.cmp(&b.start_date))
        });
        write_json_atomic(&self.path, &BudgetData { budgets: list })
    }
}

fn sort_budgets(list: &mut [Budget]) {
    list.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.start_date.cmp(&b.start_date))
    });
}

fn find_conflict<'a>(
    budgets: &'a HashMap<BudgetId, Budget>,
    candidate: &Budget,
) -> Option<&'a Budget> {
    budgets.values().find(|other| candidate.conflicts_with(other))
}

fn duplicate_error(candidate: &Budget, existing: &Budget) -> SentinelError {
    SentinelError::DuplicateBudgetPeriod {
        category: candidate.category.clone(),
        start: candidate.start_date,
        end: candidate.end_date,
        existing: existing.id,
    }
}

impl BudgetStore for BudgetRepository {
    fn list_active(&self, owner: OwnerId, category: Option<&str>) -> SentinelResult<Vec<Budget>> {
        let budgets = self.read()?;
        let mut list: Vec<_> = budgets
            .values()
            .filter(|b| b.active && b.owner_id == owner)
            .filter(|b| category.map_or(true, |c| b.category == c))
            .cloned()
            .collect();
        sort_budgets(&mut list);
        Ok(list)
    }

    fn list_active_owners(&self) -> SentinelResult<Vec<OwnerId>> {
        let budgets = self.read()?;
        let owners: BTreeSet<OwnerId> = budgets
            .values()
            .filter(|b| b.active)
            .map(|b| b.owner_id)
            .collect();
        Ok(owners.into_iter().collect())
    }

    fn get(&self, id: BudgetId, owner: OwnerId) -> SentinelResult<Option<Budget>> {
        let budgets = self.read()?;
        Ok(budgets.get(&id).filter(|b| b.owner_id == owner).cloned())
    }

    fn create(&self, new: NewBudget) -> SentinelResult<Budget> {
        let budget = Budget::from_new(new);
        let mut budgets = self.write()?;

        if let Some(existing) = find_conflict(&budgets, &budget) {
            return Err(duplicate_error(&budget, existing));
        }

        budgets.insert(budget.id, budget.clone());
        if let Err(e) = self.persist(&budgets) {
            budgets.remove(&budget.id);
            return Err(e);
        }

        Ok(budget)
    }

    fn update(
        &self,
        id: BudgetId,
        owner: OwnerId,
        patch: &BudgetPatch,
    ) -> SentinelResult<Option<Budget>> {
        let mut budgets = self.write()?;

        let before = match budgets.get(&id) {
            Some(budget) if budget.owner_id == owner => budget.clone(),
            _ => return Ok(None),
        };

        let mut updated = before.clone();
        updated.apply(patch);

        if let Some(existing) = find_conflict(&budgets, &updated) {
            return Err(duplicate_error(&updated, existing));
        }

        budgets.insert(id, updated.clone());
        if let Err(e) = self.persist(&budgets) {
            budgets.insert(id, before);
            return Err(e);
        }

        Ok(Some(updated))
    }

    fn deactivate_expired(&self, today: NaiveDate) -> SentinelResult<usize> {
        let mut budgets = self.write()?;

        let expired: Vec<BudgetId> = budgets
            .values()
            .filter(|b| b.active && b.is_expired(today))
            .map(|b| b.id)
            .collect();

        if expired.is_empty() {
            return Ok(0);
        }

        let snapshot: Vec<Budget> = expired
            .iter()
            .filter_map(|id| budgets.get(id).cloned())
            .collect();
        for id in &expired {
            if let Some(budget) = budgets.get_mut(id) {
                budget.deactivate();
            }
        }

        if let Err(e) = self.persist(&budgets) {
            for budget in snapshot {
                budgets.insert(budget.id, budget);
            }
            return Err(e);
        }

        Ok(expired.len())
    }

    fn delete(&self, id: BudgetId, owner: OwnerId) -> SentinelResult<bool> {
        let mut budgets = self.write()?;

        let owned = budgets.get(&id).is_some_and(|b| b.owner_id == owner);
        let removed = if owned { budgets.remove(&id) } else { None };

        match removed {
            Some(budget) => {
                if let Err(e) = self.persist(&budgets) {
                    budgets.insert(id, budget);
                    return Err(e);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_for_owner(&self, owner: OwnerId) -> SentinelResult<usize> {
        let mut budgets = self.write()?;

        let initial_count = budgets.len();
        let snapshot = budgets.clone();
        budgets.retain(|_, b| b.owner_id != owner);
        let removed = initial_count - budgets.len();

        if removed > 0 {
            if let Err(e) = self.persist(&budgets) {
                *budgets = snapshot;
                return Err(e);
            }
        }

        Ok(removed)
    }
}
