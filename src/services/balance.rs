//! Balance aggregator
//!
//! Balances are derived on every read by summing ledger deltas per member.
//! Nothing here writes.

use std::collections::HashMap;

use tracing::warn;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Balance, GroupBalances, GroupId, LedgerEntry, Member, MemberId, Money};
use crate::storage::Storage;

/// Sum entry deltas per member
///
/// Every listed member appears, in listing order, with zero when it has no
/// entries. Members that have entries but are no longer listed follow in the
/// order they first appear, without a name.
///
/// Fails with `InvalidAmount` when a member's running balance overflows.
pub fn aggregate(entries: &[LedgerEntry], members: &[Member]) -> LedgerResult<Vec<Balance>> {
    let mut totals: HashMap<MemberId, Money> = HashMap::new();
    let mut unlisted: Vec<MemberId> = Vec::new();

    for entry in entries {
        let total = totals.entry(entry.member_id).or_insert_with(|| {
            if !members.iter().any(|m| m.id == entry.member_id) {
                unlisted.push(entry.member_id);
            }
            Money::zero()
        });
        *total = total.checked_add(entry.delta).ok_or_else(|| {
            LedgerError::InvalidAmount(format!("balance of {} overflows", entry.member_id))
        })?;
    }

    let listed = members.iter().map(|m| Balance {
        member_id: m.id,
        member_name: Some(m.name.clone()),
        amount: totals.get(&m.id).copied().unwrap_or_default(),
    });

    let former = unlisted.iter().map(|id| Balance {
        member_id: *id,
        member_name: None,
        amount: totals.get(id).copied().unwrap_or_default(),
    });

    Ok(listed.chain(former).collect())
}

/// Service for reading derived balances
pub struct BalanceService<'a> {
    storage: &'a Storage,
}

impl<'a> BalanceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Balances of every member of a group
    pub fn balances_for(&self, group_id: GroupId) -> LedgerResult<GroupBalances> {
        let group = self
            .storage
            .groups
            .get(group_id)?
            .ok_or_else(|| LedgerError::group_not_found(group_id.to_string()))?;

        let entries = self.storage.ledger.entries_for_group(group_id)?;

        Ok(GroupBalances {
            group_id,
            balances: aggregate(&entries, &group.members)?,
        })
    }

    /// Balance of a single member; zero when the member has no entries
    pub fn balance_for(&self, group_id: GroupId, member_id: MemberId) -> LedgerResult<Money> {
        let balances = self.balances_for(group_id)?;
        Ok(balances.get(member_id).unwrap_or_default())
    }

    /// Check that a group's balances net to zero
    pub fn verify_zero_sum(&self, group_id: GroupId) -> LedgerResult<()> {
        match self.balances_for(group_id)?.total() {
            Some(total) if total.is_zero() => Ok(()),
            Some(total) => {
                warn!(%group_id, total = total.minor_units(), "group balances do not net to zero");
                Err(LedgerError::Validation(format!(
                    "balances of group {} net to {} instead of zero",
                    group_id, total
                )))
            }
            None => {
                warn!(%group_id, "group balance total overflows");
                Err(LedgerError::Validation(format!(
                    "balances of group {} overflow",
                    group_id
                )))
            }
        }
    }
}
