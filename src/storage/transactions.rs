//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, and serves
//! as the transaction source for report generation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::FintrackError;
use crate::models::{DateWindow, Money, Transaction, TransactionId, TransactionKind, UserId};
use crate::source::TransactionSource;

use super::file_io::{read_json, write_json_atomic};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with a per-user index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: user_id -> transaction_ids
    by_user: RwLock<HashMap<UserId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build the user index
    pub fn load(&self) -> Result<(), FintrackError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_user = self
            .by_user
            .write()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_user.clear();

        for txn in file_data.transactions {
            by_user.entry(txn.user_id).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        debug!(count = data.len(), path = %self.path.display(), "loaded transactions");
        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), FintrackError> {
        let data = self
            .data
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        debug!(count = transactions.len(), path = %self.path.display(), "saving transactions");
        let file_data = TransactionData { transactions };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, FintrackError> {
        let data = self
            .data
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all of a user's transactions, most recent first
    pub fn get_for_user(&self, user_id: UserId) -> Result<Vec<Transaction>, FintrackError> {
        let data = self
            .data
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_user = self
            .by_user
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_user.get(&user_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(transactions)
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), FintrackError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_user = self
            .by_user
            .write()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Remove from the old index entry if the owner changed
        if let Some(old) = data.get(&txn.id) {
            if old.user_id != txn.user_id {
                if let Some(ids) = by_user.get_mut(&old.user_id) {
                    ids.retain(|&id| id != txn.id);
                }
            }
        }

        let ids = by_user.entry(txn.user_id).or_default();
        if !ids.contains(&txn.id) {
            ids.push(txn.id);
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> Result<bool, FintrackError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_user = self
            .by_user
            .write()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(txn) = data.remove(&id) {
            if let Some(ids) = by_user.get_mut(&txn.user_id) {
                ids.retain(|&tid| tid != id);
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, FintrackError> {
        let data = self
            .data
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

impl TransactionSource for TransactionRepository {
    fn fetch(
        &self,
        user_id: UserId,
        kind: Option<TransactionKind>,
        window: DateWindow,
    ) -> Result<Vec<Transaction>, FintrackError> {
        let all = self.get_for_user(user_id)?;
        Ok(all
            .into_iter()
            .filter(|t| window.contains(t.date))
            .filter(|t| kind.map_or(true, |k| t.kind == k))
            .collect())
    }

    fn sum_by_category(
        &self,
        user_id: UserId,
        kind: TransactionKind,
        window: DateWindow,
    ) -> Result<Vec<(String, Money)>, FintrackError> {
        let matching = self.fetch(user_id, Some(kind), window)?;

        // Group while preserving first-encounter order
        let mut totals: Vec<(String, Money)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for txn in matching {
            match index.get(&txn.category) {
                Some(&i) => totals[i].1 += txn.amount,
                None => {
                    index.insert(txn.category.clone(), totals.len());
                    totals.push((txn.category, txn.amount));
                }
            }
        }

        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(user_id: UserId, units: i64, category: &str, on: NaiveDate) -> Transaction {
        Transaction::with_details(
            user_id,
            TransactionKind::Expense,
            Money::from_units(units),
            on,
            category,
            "",
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let txn = expense(UserId::new(), 50, "Food", date(2025, 1, 15));
        let id = txn.id;

        repo.upsert(txn).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.amount, Money::from_units(50));
        assert_eq!(retrieved.category, "Food");
    }

    #[test]
    fn test_get_for_user_scopes_and_orders() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let user1 = UserId::new();
        let user2 = UserId::new();

        repo.upsert(expense(user1, 10, "Food", date(2025, 1, 10))).unwrap();
        repo.upsert(expense(user1, 20, "Food", date(2025, 1, 20))).unwrap();
        repo.upsert(expense(user2, 30, "Food", date(2025, 1, 15))).unwrap();

        let user1_txns = repo.get_for_user(user1).unwrap();
        assert_eq!(user1_txns.len(), 2);
        // most recent first
        assert_eq!(user1_txns[0].date, date(2025, 1, 20));

        assert_eq!(repo.get_for_user(user2).unwrap().len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let txn = expense(UserId::new(), 50, "Food", date(2025, 1, 15));
        let id = txn.id;

        repo.upsert(txn).unwrap();
        repo.save().unwrap();

        // Create new repo and load
        let path = temp_dir.path().join("transactions.json");
        let repo2 = TransactionRepository::new(path);
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        let retrieved = repo2.get(id).unwrap().unwrap();
        assert_eq!(retrieved.amount, Money::from_units(50));
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let user_id = UserId::new();
        let txn = expense(user_id, 50, "Food", date(2025, 1, 15));
        let id = txn.id;

        repo.upsert(txn).unwrap();
        assert_eq!(repo.count().unwrap(), 1);

        assert!(repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.get_for_user(user_id).unwrap().is_empty());

        // deleting again reports false
        assert!(!repo.delete(id).unwrap());
    }

    #[test]
    fn test_fetch_filters_window_and_kind() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let user_id = UserId::new();
        repo.upsert(expense(user_id, 10, "Food", date(2025, 1, 10))).unwrap();
        repo.upsert(expense(user_id, 20, "Food", date(2025, 2, 10))).unwrap();
        repo.upsert(
            Transaction::with_details(
                user_id,
                TransactionKind::Income,
                Money::from_units(500),
                date(2025, 1, 5),
                "Salary",
                "",
            ),
        )
        .unwrap();

        let window = DateWindow::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();

        let all = repo.fetch(user_id, None, window).unwrap();
        assert_eq!(all.len(), 2);

        let expenses = repo.fetch(user_id, Some(TransactionKind::Expense), window).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, Money::from_units(10));
    }

    #[test]
    fn test_sum_by_category_groups_amounts() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let user_id = UserId::new();
        repo.upsert(expense(user_id, 15, "Food", date(2025, 1, 10))).unwrap();
        repo.upsert(expense(user_id, 10, "Food", date(2025, 1, 12))).unwrap();
        repo.upsert(expense(user_id, 5, "Transport", date(2025, 1, 14))).unwrap();

        let window = DateWindow::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();
        let totals = repo
            .sum_by_category(user_id, TransactionKind::Expense, window)
            .unwrap();

        assert_eq!(totals.len(), 2);
        let food = totals.iter().find(|(name, _)| name == "Food").unwrap();
        assert_eq!(food.1, Money::from_units(25));
        let transport = totals.iter().find(|(name, _)| name == "Transport").unwrap();
        assert_eq!(transport.1, Money::from_units(5));
    }
}
