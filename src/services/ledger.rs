//! Ledger engine
//!
//! Converts an expense and its splits into signed ledger entries and commits
//! all rows of the expense as one unit.
//!
//! Sign convention: a positive delta means the member owes more. Each
//! participant is charged its share; the payer is credited the full amount,
//! folded into its own share entry when it participates.

use tracing::warn;

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{EntrySource, Expense, LedgerEntry, Money, Split};
use crate::storage::{ExpenseBatch, Storage};

/// Build the ledger entries for an expense without touching storage
///
/// Produces one entry per split, plus one entry of `-amount` for a payer who
/// takes no share. The result always nets to zero.
pub fn build_entries(
    expense: &Expense,
    splits: &[Split],
    allow_external_payer: bool,
) -> LedgerResult<Vec<LedgerEntry>> {
    expense.validate(splits)?;

    let source = EntrySource::Expense(expense.id);
    let payer_participates = splits.iter().any(|s| s.member_id == expense.paid_by);

    if !payer_participates && !allow_external_payer {
        return Err(LedgerError::InvalidSplit(format!(
            "payer {} must be one of the participants",
            expense.paid_by
        )));
    }

    let mut entries: Vec<LedgerEntry> = splits
        .iter()
        .map(|split| {
            let delta = if split.member_id == expense.paid_by {
                split.amount - expense.amount
            } else {
                split.amount
            };
            LedgerEntry::new(expense.group_id, split.member_id, delta, source)
        })
        .collect();

    if !payer_participates {
        entries.push(LedgerEntry::new(
            expense.group_id,
            expense.paid_by,
            -expense.amount,
            source,
        ));
    }

    match Money::checked_sum(entries.iter().map(|e| e.delta)) {
        Some(net) if net.is_zero() => {}
        Some(net) => {
            return Err(LedgerError::InvalidSplit(format!(
                "ledger entries for {} net to {} instead of zero",
                expense.id, net
            )))
        }
        None => {
            return Err(LedgerError::InvalidAmount(format!(
                "ledger entries for {} overflow",
                expense.id
            )))
        }
    }

    Ok(entries)
}

/// Service that writes expenses into the ledger
pub struct LedgerService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> LedgerService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Record an expense, its splits and the derived entries atomically
    ///
    /// On any failure nothing of the expense is visible afterwards.
    pub fn record(&self, expense: &Expense, splits: &[Split]) -> LedgerResult<Vec<LedgerEntry>> {
        let entries = build_entries(expense, splits, self.settings.allow_external_payer)?;

        let batch = ExpenseBatch {
            expense: expense.clone(),
            splits: splits.to_vec(),
            entries: entries.clone(),
        };

        if let Err(err) = self.storage.ledger.commit(batch) {
            if err.is_retryable() {
                if let Err(audit_err) = self.storage.log_rollback(
                    EntityType::Expense,
                    expense.id.to_string(),
                    err.to_string(),
                ) {
                    warn!(expense_id = %expense.id, error = %audit_err, "failed to audit rollback");
                }
            }
            return Err(err);
        }

        Ok(entries)
    }
}
