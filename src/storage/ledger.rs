//! Ledger repository for JSON storage
//!
//! Expenses, their splits and their ledger entries live together in
//! ledger.json so that one atomic file replacement commits all rows of an
//! expense at once. All three tables sit behind a single lock: a reader sees
//! either every row of an expense or none of them. Commits additionally hold
//! the file lock and start from the on-disk tables, so handles in other
//! processes never overwrite each other's expenses.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LedgerError;
use crate::models::{Expense, ExpenseId, GroupId, LedgerEntry, MemberId, Money, Split};

use super::file_io::{read_json, write_json_atomic, FileLock};

/// Every row written for one expense
#[derive(Debug, Clone)]
pub struct ExpenseBatch {
    pub expense: Expense,
    pub splits: Vec<Split>,
    pub entries: Vec<LedgerEntry>,
}

/// Serializable ledger data structure, append-only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerData {
    expenses: Vec<Expense>,
    splits: Vec<Split>,
    entries: Vec<LedgerEntry>,
}

/// Table lengths before a batch was appended
#[derive(Debug, Clone, Copy)]
struct Mark {
    expenses: usize,
    splits: usize,
    entries: usize,
}

impl LedgerData {
    fn mark(&self) -> Mark {
        Mark {
            expenses: self.expenses.len(),
            splits: self.splits.len(),
            entries: self.entries.len(),
        }
    }

    fn append(&mut self, batch: ExpenseBatch) {
        self.expenses.push(batch.expense);
        self.splits.extend(batch.splits);
        self.entries.extend(batch.entries);
    }

    fn truncate_to(&mut self, mark: Mark) {
        self.expenses.truncate(mark.expenses);
        self.splits.truncate(mark.splits);
        self.entries.truncate(mark.entries);
    }

    /// Reject a batch that would push a member balance, or the sum of what
    /// the group's members owe, out of the representable range
    fn check_headroom(&self, batch: &ExpenseBatch) -> Result<(), LedgerError> {
        let group_id = batch.expense.group_id;
        let overflow = || {
            LedgerError::InvalidAmount(format!(
                "expense {} would overflow the balances of group {}",
                batch.expense.id, group_id
            ))
        };

        let mut balances: HashMap<MemberId, Money> = HashMap::new();
        let group_entries = self.entries.iter().filter(|e| e.group_id == group_id);
        for entry in group_entries.chain(&batch.entries) {
            let balance = balances.entry(entry.member_id).or_default();
            *balance = balance.checked_add(entry.delta).ok_or_else(overflow)?;
        }

        let owed = balances.values().copied().filter(|b| b.is_positive());
        Money::checked_sum(owed).ok_or_else(overflow)?;

        Ok(())
    }
}

/// Repository for the append-only expense ledger
pub struct LedgerRepository {
    path: PathBuf,
    data: RwLock<LedgerData>,
}

impl LedgerRepository {
    /// Create a new ledger repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(LedgerData::default()),
        }
    }

    /// Load the ledger from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: LedgerData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire write lock: {}", e))
        })?;

        *data = file_data;
        Ok(())
    }

    /// Append all rows of one expense and persist them as a single unit
    ///
    /// The batch is appended to the tables as they are on disk, read while
    /// the file lock is held. If persisting fails the appended rows are
    /// removed again before the lock is released, so no reader ever observes
    /// them.
    pub fn commit(&self, batch: ExpenseBatch) -> Result<(), LedgerError> {
        let _file_lock = FileLock::acquire(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire write lock: {}", e))
        })?;

        *data = read_json(&self.path)?;

        let expense_id = batch.expense.id;
        if data.expenses.iter().any(|e| e.id == expense_id) {
            return Err(LedgerError::Duplicate {
                entity_type: "Expense",
                identifier: expense_id.to_string(),
            });
        }

        data.check_headroom(&batch)?;

        let mark = data.mark();
        data.append(batch);

        if let Err(err) = write_json_atomic(&self.path, &*data) {
            data.truncate_to(mark);
            warn!(%expense_id, error = %err, "ledger commit failed, rows rolled back");
            return Err(err);
        }

        debug!(%expense_id, entries = data.entries.len() - mark.entries, "ledger commit");
        Ok(())
    }

    /// Get an expense by ID
    pub fn get_expense(&self, id: ExpenseId) -> Result<Option<Expense>, LedgerError> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.expenses.iter().find(|e| e.id == id).cloned())
    }

    /// Get a group's expenses, newest first
    pub fn expenses_for_group(&self, group_id: GroupId) -> Result<Vec<Expense>, LedgerError> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut expenses: Vec<_> = data
            .expenses
            .iter()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect();
        expenses.reverse();
        Ok(expenses)
    }

    /// Get the split rows of an expense
    pub fn splits_for_expense(&self, id: ExpenseId) -> Result<Vec<Split>, LedgerError> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .splits
            .iter()
            .filter(|s| s.expense_id == id)
            .cloned()
            .collect())
    }

    /// Get the ledger entries derived from an expense
    pub fn entries_for_expense(&self, id: ExpenseId) -> Result<Vec<LedgerEntry>, LedgerError> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .entries
            .iter()
            .filter(|e| e.expense_id() == id)
            .cloned()
            .collect())
    }

    /// Get every ledger entry of a group in append order
    pub fn entries_for_group(&self, group_id: GroupId) -> Result<Vec<LedgerEntry>, LedgerError> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .entries
            .iter()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect())
    }

    /// Count expenses
    pub fn expense_count(&self) -> Result<usize, LedgerError> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.expenses.len())
    }

    /// Count ledger entries
    pub fn entry_count(&self) -> Result<usize, LedgerError> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntrySource, SplitType};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, LedgerRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");
        let repo = LedgerRepository::new(path);
        (temp_dir, repo)
    }

    /// Payer fronts 200 split evenly with one other member
    fn sample_batch(group_id: GroupId) -> ExpenseBatch {
        let payer = MemberId::new();
        let other = MemberId::new();
        let expense = Expense::new(
            group_id,
            payer,
            Money::from_minor(200),
            "Dinner",
            SplitType::Equal,
        );
        let source = EntrySource::Expense(expense.id);
        ExpenseBatch {
            splits: vec![
                Split::new(expense.id, payer, Money::from_minor(100)),
                Split::new(expense.id, other, Money::from_minor(100)),
            ],
            entries: vec![
                LedgerEntry::new(group_id, payer, Money::from_minor(-100), source),
                LedgerEntry::new(group_id, other, Money::from_minor(100), source),
            ],
            expense,
        }
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.expense_count().unwrap(), 0);
        assert_eq!(repo.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_commit_and_query() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let group_id = GroupId::new();
        let batch = sample_batch(group_id);
        let expense_id = batch.expense.id;
        repo.commit(batch).unwrap();

        assert!(repo.get_expense(expense_id).unwrap().is_some());
        assert_eq!(repo.splits_for_expense(expense_id).unwrap().len(), 2);
        assert_eq!(repo.entries_for_expense(expense_id).unwrap().len(), 2);
        assert_eq!(repo.entries_for_group(group_id).unwrap().len(), 2);
        assert!(repo.entries_for_group(GroupId::new()).unwrap().is_empty());
    }

    #[test]
    fn test_commit_survives_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let group_id = GroupId::new();
        repo.commit(sample_batch(group_id)).unwrap();
        repo.commit(sample_batch(group_id)).unwrap();

        let repo2 = LedgerRepository::new(temp_dir.path().join("ledger.json"));
        repo2.load().unwrap();

        assert_eq!(repo2.expense_count().unwrap(), 2);
        assert_eq!(repo2.entry_count().unwrap(), 4);
        let expenses = repo2.expenses_for_group(group_id).unwrap();
        assert_eq!(expenses.len(), 2);
    }

    #[test]
    fn test_expenses_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let group_id = GroupId::new();
        let first = sample_batch(group_id);
        let second = sample_batch(group_id);
        let second_id = second.expense.id;
        repo.commit(first).unwrap();
        repo.commit(second).unwrap();

        assert_eq!(repo.expenses_for_group(group_id).unwrap()[0].id, second_id);
    }

    #[test]
    fn test_duplicate_expense_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let batch = sample_batch(GroupId::new());
        repo.commit(batch.clone()).unwrap();

        let err = repo.commit(batch).unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate { .. }));
        assert_eq!(repo.expense_count().unwrap(), 1);
        assert_eq!(repo.entry_count().unwrap(), 2);
    }

    #[test]
    fn test_failed_commit_rolls_back_all_rows() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let group_id = GroupId::new();
        repo.commit(sample_batch(group_id)).unwrap();

        // A directory at the temp path makes the next write fail
        let temp_path = temp_dir.path().join("ledger.json.tmp");
        std::fs::create_dir_all(temp_path.join("blocker")).unwrap();

        let batch = sample_batch(group_id);
        let expense_id = batch.expense.id;
        let err = repo.commit(batch).unwrap_err();

        assert!(err.is_retryable());
        assert!(repo.get_expense(expense_id).unwrap().is_none());
        assert!(repo.splits_for_expense(expense_id).unwrap().is_empty());
        assert!(repo.entries_for_expense(expense_id).unwrap().is_empty());
        assert_eq!(repo.expense_count().unwrap(), 1);
        assert_eq!(repo.entry_count().unwrap(), 2);

        let repo2 = LedgerRepository::new(temp_dir.path().join("ledger.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.expense_count().unwrap(), 1);
    }

    #[test]
    fn test_two_handles_keep_each_others_expenses() {
        let (temp_dir, first) = create_test_repo();
        let second = LedgerRepository::new(temp_dir.path().join("ledger.json"));
        first.load().unwrap();
        second.load().unwrap();

        // Both handles loaded the empty ledger before either committed
        let group_id = GroupId::new();
        first.commit(sample_batch(group_id)).unwrap();
        second.commit(sample_batch(group_id)).unwrap();
        first.commit(sample_batch(group_id)).unwrap();

        assert_eq!(first.expense_count().unwrap(), 3);

        let fresh = LedgerRepository::new(temp_dir.path().join("ledger.json"));
        fresh.load().unwrap();
        assert_eq!(fresh.expenses_for_group(group_id).unwrap().len(), 3);
        assert_eq!(fresh.entry_count().unwrap(), 6);
    }

    #[test]
    fn test_handles_committing_in_parallel_lose_nothing() {
        let (temp_dir, _repo) = create_test_repo();
        let group_id = GroupId::new();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let path = temp_dir.path().join("ledger.json");
                scope.spawn(move || {
                    let repo = LedgerRepository::new(path);
                    repo.load().unwrap();
                    for _ in 0..5 {
                        repo.commit(sample_batch(group_id)).unwrap();
                    }
                });
            }
        });

        let fresh = LedgerRepository::new(temp_dir.path().join("ledger.json"));
        fresh.load().unwrap();
        assert_eq!(fresh.expense_count().unwrap(), 20);
        assert_eq!(fresh.entry_count().unwrap(), 40);
    }

    /// Payer fronts `amount` for a single other participant
    fn one_sided_batch(
        group_id: GroupId,
        payer: MemberId,
        other: MemberId,
        amount: i64,
    ) -> ExpenseBatch {
        let expense = Expense::new(
            group_id,
            payer,
            Money::from_minor(amount),
            "Deposit",
            SplitType::Exact,
        );
        let source = EntrySource::Expense(expense.id);
        ExpenseBatch {
            splits: vec![Split::new(expense.id, other, Money::from_minor(amount))],
            entries: vec![
                LedgerEntry::new(group_id, payer, Money::from_minor(-amount), source),
                LedgerEntry::new(group_id, other, Money::from_minor(amount), source),
            ],
            expense,
        }
    }

    #[test]
    fn test_commit_rejects_balance_overflow() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let group_id = GroupId::new();
        let (payer, other) = (MemberId::new(), MemberId::new());
        let amount = 9_000_000_000_000_000_000;

        repo.commit(one_sided_batch(group_id, payer, other, amount)).unwrap();

        let batch = one_sided_batch(group_id, payer, other, amount);
        let expense_id = batch.expense.id;
        let err = repo.commit(batch).unwrap_err();

        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert!(!err.is_retryable());
        assert!(repo.get_expense(expense_id).unwrap().is_none());
        assert_eq!(repo.entries_for_group(group_id).unwrap().len(), 2);

        // Another group has its own headroom
        repo.commit(one_sided_batch(GroupId::new(), payer, other, amount)).unwrap();

        let repo2 = LedgerRepository::new(temp_dir.path().join("ledger.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.expense_count().unwrap(), 2);
    }

    #[test]
    fn test_commit_rejects_overflowing_amount_owed() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        // Two payers each front most of the range for two different members
        let group_id = GroupId::new();
        let amount = 5_000_000_000_000_000_000;
        let (a, b, c, d) = (MemberId::new(), MemberId::new(), MemberId::new(), MemberId::new());

        repo.commit(one_sided_batch(group_id, a, b, amount)).unwrap();
        let err = repo.commit(one_sided_batch(group_id, c, d, amount)).unwrap_err();

        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert_eq!(repo.expense_count().unwrap(), 1);
    }
}
