//! Expense service
//!
//! The request surface for recording a shared expense: validates the input,
//! computes shares, derives ledger entries and commits everything as one
//! unit before auditing.

use tracing::{info, warn};

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Expense, ExpenseId, GroupId, LedgerEntry, MemberId, Money, Split, SplitStrategy,
};
use crate::storage::Storage;

use super::ledger::LedgerService;
use super::split::SplitCalculator;

/// Input for recording an expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub group_id: GroupId,
    pub paid_by: MemberId,
    pub amount: Money,
    pub description: String,
    pub strategy: SplitStrategy,
    /// Ordered; the order decides who absorbs equal-split remainders
    pub participants: Vec<MemberId>,
}

/// An expense together with every row written for it
#[derive(Debug, Clone)]
pub struct ExpenseDetails {
    pub expense: Expense,
    pub splits: Vec<Split>,
    pub entries: Vec<LedgerEntry>,
}

/// Service for recording and reading expenses
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Record an expense and its ledger entries
    ///
    /// Either the expense, all of its splits and all of its entries become
    /// visible together, or none of them do.
    pub fn create(&self, input: CreateExpenseInput) -> LedgerResult<ExpenseDetails> {
        if !input.amount.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "expense amount must be positive, got {}",
                input.amount
            )));
        }

        let description = input.description.trim();
        if description.is_empty() {
            return Err(LedgerError::Validation(
                "Expense description cannot be empty".into(),
            ));
        }

        if self.storage.groups.get(input.group_id)?.is_none() {
            return Err(LedgerError::group_not_found(input.group_id.to_string()));
        }

        let shares = SplitCalculator::new(self.settings.remainder_policy).compute(
            input.amount,
            &input.strategy,
            &input.participants,
            input.paid_by,
        )?;

        let expense = Expense::new(
            input.group_id,
            input.paid_by,
            input.amount,
            description,
            input.strategy.split_type(),
        );

        let splits: Vec<Split> = shares
            .iter()
            .map(|share| Split::new(expense.id, share.member_id, share.amount))
            .collect();

        let entries = LedgerService::new(self.storage, self.settings).record(&expense, &splits)?;

        info!(
            expense_id = %expense.id,
            group_id = %expense.group_id,
            amount = expense.amount.minor_units(),
            entries = entries.len(),
            "expense recorded"
        );

        if let Err(err) = self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        ) {
            warn!(expense_id = %expense.id, error = %err, "failed to audit expense");
        }

        Ok(ExpenseDetails {
            expense,
            splits,
            entries,
        })
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> LedgerResult<Option<Expense>> {
        self.storage.ledger.get_expense(id)
    }

    /// Find an expense of a group by full or short ID
    pub fn find(&self, group_id: GroupId, identifier: &str) -> LedgerResult<Option<Expense>> {
        let identifier = identifier.trim();

        if let Ok(id) = identifier.parse::<ExpenseId>() {
            return Ok(self.get(id)?.filter(|e| e.group_id == group_id));
        }

        let matches: Vec<Expense> = self
            .list_for_group(group_id)?
            .into_iter()
            .filter(|e| e.id.short() == identifier)
            .collect();

        Ok(match matches.len() {
            1 => matches.into_iter().next(),
            _ => None,
        })
    }

    /// Get a group's expenses, newest first
    pub fn list_for_group(&self, group_id: GroupId) -> LedgerResult<Vec<Expense>> {
        self.storage.ledger.expenses_for_group(group_id)
    }

    /// Get the split rows of an expense
    pub fn splits_for(&self, id: ExpenseId) -> LedgerResult<Vec<Split>> {
        self.storage.ledger.splits_for_expense(id)
    }

    /// Get the ledger entries derived from an expense
    pub fn entries_for(&self, id: ExpenseId) -> LedgerResult<Vec<LedgerEntry>> {
        self.storage.ledger.entries_for_expense(id)
    }

    /// Get an expense with its splits and entries
    pub fn details(&self, id: ExpenseId) -> LedgerResult<ExpenseDetails> {
        let expense = self
            .get(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;

        Ok(ExpenseDetails {
            splits: self.splits_for(id)?,
            entries: self.entries_for(id)?,
            expense,
        })
    }
}
