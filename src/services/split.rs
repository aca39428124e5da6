//! Split calculator
//!
//! Turns an expense amount, a split strategy and an ordered participant list
//! into one share per participant. Every successful result sums exactly to
//! the amount; nothing is dropped and nothing is invented.

use std::collections::HashSet;

use tracing::debug;

use crate::config::RemainderPolicy;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{MemberId, Money, SplitStrategy};

/// One participant's computed share
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Share {
    pub member_id: MemberId,
    pub amount: Money,
}

/// Pure calculator for per-participant shares
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitCalculator {
    policy: RemainderPolicy,
}

impl SplitCalculator {
    pub fn new(policy: RemainderPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RemainderPolicy {
        self.policy
    }

    /// Compute shares in participant order
    ///
    /// `payer` only matters for [`RemainderPolicy::Payer`].
    pub fn compute(
        &self,
        amount: Money,
        strategy: &SplitStrategy,
        participants: &[MemberId],
        payer: MemberId,
    ) -> LedgerResult<Vec<Share>> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "expense amount must be positive, got {}",
                amount
            )));
        }

        if participants.is_empty() {
            return Err(LedgerError::InvalidSplit(
                "at least one participant is required".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(participants.len());
        if let Some(dup) = participants.iter().find(|p| !seen.insert(**p)) {
            return Err(LedgerError::InvalidSplit(format!(
                "participant {} is listed more than once",
                dup
            )));
        }

        let shares = match strategy {
            SplitStrategy::Equal => self.equal(amount, participants, payer)?,
            SplitStrategy::Exact(amounts) => exact(amount, amounts, participants)?,
        };

        debug!(
            amount = amount.minor_units(),
            participants = participants.len(),
            split_type = %strategy.split_type(),
            "computed split"
        );

        Ok(shares)
    }

    fn equal(
        &self,
        amount: Money,
        participants: &[MemberId],
        payer: MemberId,
    ) -> LedgerResult<Vec<Share>> {
        let (per_head, remainder) = amount.split_floor(participants.len()).ok_or_else(|| {
            LedgerError::InvalidSplit("at least one participant is required".into())
        })?;

        let mut shares: Vec<Share> = participants
            .iter()
            .map(|&member_id| Share {
                member_id,
                amount: per_head,
            })
            .collect();

        if remainder == 0 {
            return Ok(shares);
        }

        let payer_share = shares.iter_mut().find(|s| s.member_id == payer);
        match (self.policy, payer_share) {
            (RemainderPolicy::Reject, _) => {
                return Err(LedgerError::InvalidSplit(format!(
                    "{} does not divide evenly among {} participants",
                    amount,
                    participants.len()
                )));
            }
            (RemainderPolicy::Payer, Some(share)) => {
                share.amount += Money::from_minor(remainder);
            }
            // Payer policy without a participating payer falls through
            (RemainderPolicy::Payer, None) | (RemainderPolicy::Distribute, _) => {
                // remainder < participants.len(), so the cast cannot truncate
                for share in shares.iter_mut().take(remainder as usize) {
                    share.amount += Money::from_minor(1);
                }
            }
        }

        Ok(shares)
    }
}

fn exact(
    amount: Money,
    amounts: &std::collections::BTreeMap<MemberId, Money>,
    participants: &[MemberId],
) -> LedgerResult<Vec<Share>> {
    if let Some(stranger) = amounts.keys().find(|id| !participants.contains(id)) {
        return Err(LedgerError::InvalidSplit(format!(
            "exact amount given for {} who is not a participant",
            stranger
        )));
    }

    let mut shares = Vec::with_capacity(participants.len());
    let mut total = Money::zero();

    for &member_id in participants {
        let share = *amounts.get(&member_id).ok_or_else(|| {
            LedgerError::InvalidSplit(format!("missing exact amount for {}", member_id))
        })?;

        if share.is_negative() {
            return Err(LedgerError::InvalidSplit(format!(
                "exact amount for {} is negative",
                member_id
            )));
        }

        total = total.checked_add(share).ok_or_else(|| {
            LedgerError::InvalidAmount("exact amounts overflow when totalled".into())
        })?;

        shares.push(Share {
            member_id,
            amount: share,
        });
    }

    if total != amount {
        return Err(LedgerError::SplitMismatch {
            expected: amount,
            actual: total,
        });
    }

    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn members(n: usize) -> Vec<MemberId> {
        (0..n).map(|_| MemberId::new()).collect()
    }

    fn amounts(shares: &[Share]) -> Vec<i64> {
        shares.iter().map(|s| s.amount.minor_units()).collect()
    }

    #[test]
    fn test_equal_even_split() {
        let abc = members(3);
        let shares = SplitCalculator::default()
            .compute(Money::from_minor(300), &SplitStrategy::Equal, &abc, abc[0])
            .unwrap();

        assert_eq!(amounts(&shares), vec![100, 100, 100]);
        assert_eq!(shares[1].member_id, abc[1]);
    }

    #[test]
    fn test_equal_remainder_distributed_to_first_participants() {
        let abcd = members(4);
        let shares = SplitCalculator::new(RemainderPolicy::Distribute)
            .compute(Money::from_minor(1003), &SplitStrategy::Equal, &abcd, abcd[3])
            .unwrap();

        assert_eq!(amounts(&shares), vec![251, 251, 251, 250]);
    }

    #[test]
    fn test_equal_remainder_to_payer() {
        let abc = members(3);
        let shares = SplitCalculator::new(RemainderPolicy::Payer)
            .compute(Money::from_minor(302), &SplitStrategy::Equal, &abc, abc[2])
            .unwrap();

        assert_eq!(amounts(&shares), vec![100, 100, 102]);
    }

    #[test]
    fn test_equal_remainder_to_payer_falls_back_when_payer_absent() {
        let abc = members(3);
        let outsider = MemberId::new();
        let shares = SplitCalculator::new(RemainderPolicy::Payer)
            .compute(Money::from_minor(302), &SplitStrategy::Equal, &abc, outsider)
            .unwrap();

        assert_eq!(amounts(&shares), vec![101, 101, 100]);
    }

    #[test]
    fn test_equal_remainder_rejected() {
        let abc = members(3);
        let err = SplitCalculator::new(RemainderPolicy::Reject)
            .compute(Money::from_minor(301), &SplitStrategy::Equal, &abc, abc[0])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSplit(_)));

        // Divisible amounts are fine under every policy
        assert!(SplitCalculator::new(RemainderPolicy::Reject)
            .compute(Money::from_minor(300), &SplitStrategy::Equal, &abc, abc[0])
            .is_ok());
    }

    #[test]
    fn test_amount_smaller_than_participant_count() {
        let abc = members(3);
        let shares = SplitCalculator::default()
            .compute(Money::from_minor(2), &SplitStrategy::Equal, &abc, abc[0])
            .unwrap();
        assert_eq!(amounts(&shares), vec![1, 1, 0]);
    }

    #[test]
    fn test_empty_participants() {
        let err = SplitCalculator::default()
            .compute(Money::from_minor(300), &SplitStrategy::Equal, &[], MemberId::new())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSplit(_)));
    }

    #[test]
    fn test_duplicate_participants() {
        let a = MemberId::new();
        let err = SplitCalculator::default()
            .compute(Money::from_minor(300), &SplitStrategy::Equal, &[a, a], a)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSplit(_)));
    }

    #[test]
    fn test_non_positive_amount() {
        let a = members(1);
        for amount in [0, -100] {
            let err = SplitCalculator::default()
                .compute(Money::from_minor(amount), &SplitStrategy::Equal, &a, a[0])
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidAmount(_)));
        }
    }

    #[test]
    fn test_exact_split() {
        let ab = members(2);
        let strategy = SplitStrategy::Exact(BTreeMap::from([
            (ab[0], Money::from_minor(200)),
            (ab[1], Money::from_minor(300)),
        ]));

        let shares = SplitCalculator::default()
            .compute(Money::from_minor(500), &strategy, &ab, ab[0])
            .unwrap();
        assert_eq!(amounts(&shares), vec![200, 300]);
    }

    #[test]
    fn test_exact_split_allows_explicit_zero() {
        let abc = members(3);
        let strategy = SplitStrategy::Exact(BTreeMap::from([
            (abc[0], Money::from_minor(0)),
            (abc[1], Money::from_minor(250)),
            (abc[2], Money::from_minor(250)),
        ]));

        let shares = SplitCalculator::default()
            .compute(Money::from_minor(500), &strategy, &abc, abc[0])
            .unwrap();
        assert_eq!(amounts(&shares), vec![0, 250, 250]);
    }

    #[test]
    fn test_exact_split_mismatch() {
        let ab = members(2);
        let strategy = SplitStrategy::Exact(BTreeMap::from([
            (ab[0], Money::from_minor(200)),
            (ab[1], Money::from_minor(250)),
        ]));

        let err = SplitCalculator::default()
            .compute(Money::from_minor(500), &strategy, &ab, ab[0])
            .unwrap_err();

        match err {
            LedgerError::SplitMismatch { expected, actual } => {
                assert_eq!(expected.minor_units(), 500);
                assert_eq!(actual.minor_units(), 450);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_exact_split_missing_participant() {
        let ab = members(2);
        let strategy = SplitStrategy::Exact(BTreeMap::from([(ab[0], Money::from_minor(500))]));

        let err = SplitCalculator::default()
            .compute(Money::from_minor(500), &strategy, &ab, ab[0])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSplit(_)));
    }

    #[test]
    fn test_exact_split_unknown_member() {
        let ab = members(2);
        let strategy = SplitStrategy::Exact(BTreeMap::from([
            (ab[0], Money::from_minor(250)),
            (ab[1], Money::from_minor(250)),
            (MemberId::new(), Money::from_minor(0)),
        ]));

        let err = SplitCalculator::default()
            .compute(Money::from_minor(500), &strategy, &ab, ab[0])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSplit(_)));
    }

    #[test]
    fn test_exact_split_negative_share() {
        let ab = members(2);
        let strategy = SplitStrategy::Exact(BTreeMap::from([
            (ab[0], Money::from_minor(-100)),
            (ab[1], Money::from_minor(600)),
        ]));

        let err = SplitCalculator::default()
            .compute(Money::from_minor(500), &strategy, &ab, ab[0])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSplit(_)));
    }
}
