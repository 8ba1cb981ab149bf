//! Transaction service
//!
//! Records the spending the budget engine aggregates.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{SentinelError, SentinelResult};
use crate::models::{Money, OwnerId, Transaction, TransactionKind};
use crate::storage::Storage;

/// Filter options for listing transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub category: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    fn matches(&self, txn: &Transaction) -> bool {
        self.category.as_deref().map_or(true, |c| txn.category == c)
            && self.from.map_or(true, |from| txn.date >= from)
            && self.to.map_or(true, |to| txn.date <= to)
    }
}

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a transaction
    pub fn add(
        &self,
        owner: OwnerId,
        category: &str,
        kind: TransactionKind,
        amount: Money,
        date: NaiveDate,
        memo: Option<String>,
    ) -> SentinelResult<Transaction> {
        let mut txn = Transaction::new(owner, category.trim(), kind, amount, date);
        if let Some(memo) = memo {
            txn = txn.with_memo(memo);
        }

        txn.validate()
            .map_err(|e| SentinelError::Validation(e.to_string()))?;

        self.storage.transactions.insert(txn.clone())?;
        self.storage.transactions.save()?;

        info!(
            transaction = %txn.id,
            owner = %owner,
            category = %txn.category,
            amount = %txn.amount,
            "Recorded transaction"
        );
        Ok(txn)
    }

    /// Transactions of an owner, newest first
    pub fn list(
        &self,
        owner: OwnerId,
        filter: &TransactionFilter,
    ) -> SentinelResult<Vec<Transaction>> {
        let mut transactions: Vec<_> = self
            .storage
            .transactions
            .list_for_owner(owner)?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    /// Find a transaction by full ID or short display form
    pub fn find(&self, owner: OwnerId, reference: &str) -> SentinelResult<Transaction> {
        self.storage
            .transactions
            .list_for_owner(owner)?
            .into_iter()
            .find(|t| t.id.matches(reference))
            .ok_or_else(|| SentinelError::transaction_not_found(reference))
    }

    pub fn delete(&self, owner: OwnerId, reference: &str) -> SentinelResult<Transaction> {
        let txn = self.find(owner, reference)?;
        if !self.storage.transactions.delete(txn.id, owner)? {
            return Err(SentinelError::transaction_not_found(reference));
        }
        self.storage.transactions.save()?;

        info!(transaction = %txn.id, owner = %owner, "Deleted transaction");
        Ok(txn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SentinelPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SentinelPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    #[test]
    fn test_add_persists() {
        let (temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let txn = service
            .add(
                OwnerId::new(1),
                " food ",
                TransactionKind::Expense,
                Money::from_cents(1250),
                date(3),
                Some("groceries".into()),
            )
            .unwrap();
        assert_eq!(txn.category, "food");

        let reopened =
            Storage::open(SentinelPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        assert_eq!(reopened.transactions.count().unwrap(), 1);
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let owner = OwnerId::new(1);

        let zero = service.add(owner, "food", TransactionKind::Expense, Money::zero(), date(1), None);
        assert!(matches!(zero, Err(SentinelError::Validation(_))));

        let blank = service.add(
            owner,
            "",
            TransactionKind::Expense,
            Money::from_cents(5),
            date(1),
            None,
        );
        assert!(blank.unwrap_err().is_validation());
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_list_with_filter() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let owner = OwnerId::new(1);

        for (cat, day) in [("food", 1), ("food", 10), ("rent", 5), ("food", 20)] {
            service
                .add(owner, cat, TransactionKind::Expense, Money::from_cents(100), date(day), None)
                .unwrap();
        }

        let food = TransactionFilter {
            category: Some("food".into()),
            ..Default::default()
        };
        assert_eq!(service.list(owner, &food).unwrap().len(), 3);

        let window = TransactionFilter {
            from: Some(date(5)),
            to: Some(date(15)),
            ..Default::default()
        };
        assert_eq!(service.list(owner, &window).unwrap().len(), 2);

        let latest = TransactionFilter {
            limit: Some(1),
            ..Default::default()
        };
        let listed = service.list(owner, &latest).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].date, date(20));
    }

    #[test]
    fn test_delete_by_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let owner = OwnerId::new(1);

        let txn = service
            .add(owner, "food", TransactionKind::Expense, Money::from_cents(100), date(1), None)
            .unwrap();

        assert!(service
            .delete(OwnerId::new(2), &txn.id.to_string())
            .unwrap_err()
            .is_not_found());
        let deleted = service.delete(owner, &txn.id.to_string()).unwrap();
        assert_eq!(deleted.id, txn.id);
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }
}
