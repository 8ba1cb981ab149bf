//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with an
//! owner index for the per-owner aggregations the budget engine runs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::{SentinelError, SentinelResult};
use crate::models::{Money, OwnerId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};
use super::TransactionStore;

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

#[derive(Default)]
struct Inner {
    data: HashMap<TransactionId, Transaction>,
    /// Index: owner_id -> transaction_ids
    by_owner: HashMap<OwnerId, Vec<TransactionId>>,
}

impl Inner {
    fn insert(&mut self, txn: Transaction) {
        self.by_owner.entry(txn.owner_id).or_default().push(txn.id);
        self.data.insert(txn.id, txn);
    }

    fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        let txn = self.data.remove(&id)?;
        if let Some(ids) = self.by_owner.get_mut(&txn.owner_id) {
            ids.retain(|t| *t != id);
        }
        Some(txn)
    }

    fn owned_by(&self, owner: OwnerId) -> impl Iterator<Item = &Transaction> {
        self.by_owner
            .get(&owner)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.data.get(id))
    }
}

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    inner: RwLock<Inner>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Load transactions from disk and build indexes
    pub fn load(&self) -> SentinelResult<()> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|e| SentinelError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *inner = Inner::default();
        for txn in file_data.transactions {
            inner.insert(txn);
        }

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> SentinelResult<()> {
        let inner = self
            .inner
            .read()
            .map_err(|e| SentinelError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = inner.data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID, only if it belongs to `owner`
    pub fn get(&self, id: TransactionId, owner: OwnerId) -> SentinelResult<Option<Transaction>> {
        let inner = self
            .inner
            .read()
            .map_err(|e| SentinelError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(inner.data.get(&id).filter(|t| t.owner_id == owner).cloned())
    }

    /// Transactions of an owner, newest first
    pub fn list_for_owner(&self, owner: OwnerId) -> SentinelResult<Vec<Transaction>> {
        let inner = self
            .inner
            .read()
            .map_err(|e| SentinelError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = inner.owned_by(owner).cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(transactions)
    }

    /// Insert a transaction
    pub fn insert(&self, txn: Transaction) -> SentinelResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| SentinelError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        inner.insert(txn);
        Ok(())
    }

    /// Remove a transaction belonging to `owner`
    pub fn delete(&self, id: TransactionId, owner: OwnerId) -> SentinelResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| SentinelError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let owned = inner.data.get(&id).is_some_and(|t| t.owner_id == owner);
        Ok(owned && inner.remove(id).is_some())
    }

    /// Remove every transaction of an owner
    pub fn delete_for_owner(&self, owner: OwnerId) -> SentinelResult<usize> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| SentinelError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ids = inner.by_owner.remove(&owner).unwrap_or_default();
        for id in &ids {
            inner.data.remove(id);
        }
        Ok(ids.len())
    }

    pub fn count(&self) -> SentinelResult<usize> {
        let inner = self
            .inner
            .read()
            .map_err(|e| SentinelError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(inner.data.len())
    }
}

impl TransactionStore for TransactionRepository {
    fn sum_expenses(
        &self,
        owner: OwnerId,
        category: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> SentinelResult<Money> {
        let inner = self
            .inner
            .read()
            .map_err(|e| SentinelError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let result = inner
            .owned_by(owner)
            .filter(|t| t.counts_toward(category, from, to))
            .try_fold(Money::zero(), |total, t| total.checked_add(t.amount))
            .ok_or_else(|| {
                SentinelError::ComputationDegenerate(format!(
                    "expenses of {} in '{}' over {}..{} overflow",
                    owner, category, from, to
                ))
            });
        result
    }
}
