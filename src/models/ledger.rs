//! Ledger entry and balance models
//!
//! Ledger entries are append-only signed facts. A member's balance is never
//! stored; it is the sum of that member's entry deltas. Positive means the
//! member owes the group, negative means the group owes the member.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EntryId, ExpenseId, GroupId, MemberId};
use super::money::Money;

/// What produced a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source_type", content = "source_id", rename_all = "lowercase")]
pub enum EntrySource {
    Expense(ExpenseId),
}

/// One member's change in obligation caused by one source event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,

    pub group_id: GroupId,

    pub member_id: MemberId,

    /// Signed change; positive increases what the member owes
    pub delta: Money,

    #[serde(flatten)]
    pub source: EntrySource,

    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(group_id: GroupId, member_id: MemberId, delta: Money, source: EntrySource) -> Self {
        Self {
            id: EntryId::new(),
            group_id,
            member_id,
            delta,
            source,
            created_at: Utc::now(),
        }
    }

    /// Expense this entry was derived from
    pub fn expense_id(&self) -> ExpenseId {
        match self.source {
            EntrySource::Expense(id) => id,
        }
    }
}

/// A member's derived balance within a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub member_id: MemberId,

    /// Display name, or None when the member is no longer listed
    pub member_name: Option<String>,

    pub amount: Money,
}

impl Balance {
    /// Member owes money to the group
    pub fn owes(&self) -> bool {
        self.amount.is_positive()
    }

    /// Group owes money to the member
    pub fn is_owed(&self) -> bool {
        self.amount.is_negative()
    }
}

/// Balances of every member of a group, in member listing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupBalances {
    pub group_id: GroupId,
    pub balances: Vec<Balance>,
}

impl GroupBalances {
    /// Sum over all members; zero for any consistent ledger
    ///
    /// `None` when the running sum leaves the representable range.
    pub fn total(&self) -> Option<Money> {
        Money::checked_sum(self.balances.iter().map(|b| b.amount))
    }

    pub fn is_balanced(&self) -> bool {
        self.total().is_some_and(|t| t.is_zero())
    }

    pub fn get(&self, member_id: MemberId) -> Option<Money> {
        self.balances
            .iter()
            .find(|b| b.member_id == member_id)
            .map(|b| b.amount)
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}
