//! Storage layer for Budget Sentinel
//!
//! The budget engine talks to storage only through two narrow traits:
//! [`BudgetStore`] for budget lookups and writes, and [`TransactionStore`] for
//! the one aggregation it needs. The JSON file repositories here implement
//! both; any other backend only has to implement the traits.

pub mod budget;
pub mod file_io;
pub mod transactions;

pub use budget::BudgetRepository;
pub use file_io::{read_json, write_json_atomic};
pub use transactions::TransactionRepository;

use chrono::NaiveDate;

use crate::config::paths::SentinelPaths;
use crate::error::SentinelResult;
use crate::models::{Budget, BudgetId, BudgetPatch, Money, NewBudget, OwnerId};

/// Budget persistence as seen by the engine
///
/// Implementations must reject a `create` or `update` that would leave two
/// active budgets of one owner and category with overlapping windows, with
/// `SentinelError::DuplicateBudgetPeriod`.
pub trait BudgetStore: Send + Sync {
    /// Active budgets of an owner, optionally narrowed to one category
    fn list_active(&self, owner: OwnerId, category: Option<&str>) -> SentinelResult<Vec<Budget>>;

    /// Distinct owners having at least one active budget, ascending
    fn list_active_owners(&self) -> SentinelResult<Vec<OwnerId>>;

    /// A budget by id; `None` when absent or owned by someone else
    fn get(&self, id: BudgetId, owner: OwnerId) -> SentinelResult<Option<Budget>>;

    fn create(&self, new: NewBudget) -> SentinelResult<Budget>;

    /// Apply a patch; `None` when absent or owned by someone else
    fn update(
        &self,
        id: BudgetId,
        owner: OwnerId,
        patch: &BudgetPatch,
    ) -> SentinelResult<Option<Budget>>;

    /// Deactivate every active budget whose window ended before `today`
    fn deactivate_expired(&self, today: NaiveDate) -> SentinelResult<usize>;

    fn delete(&self, id: BudgetId, owner: OwnerId) -> SentinelResult<bool>;

    fn delete_for_owner(&self, owner: OwnerId) -> SentinelResult<usize>;
}

/// Transaction aggregation as seen by the engine
pub trait TransactionStore: Send + Sync {
    /// Sum of expense amounts for an owner and category dated within `[from, to]`
    fn sum_expenses(
        &self,
        owner: OwnerId,
        category: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> SentinelResult<Money>;
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: SentinelPaths,
    pub budgets: BudgetRepository,
    pub transactions: TransactionRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: SentinelPaths) -> SentinelResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            budgets: BudgetRepository::new(paths.budgets_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            paths,
        })
    }

    /// Create storage and load everything from disk
    pub fn open(paths: SentinelPaths) -> SentinelResult<Self> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &SentinelPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> SentinelResult<()> {
        self.budgets.load()?;
        self.transactions.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> SentinelResult<()> {
        self.budgets.save()?;
        self.transactions.save()?;
        Ok(())
    }
}
