//! Expense model
//!
//! An expense is an immutable record of one spending event inside a group:
//! who paid, how much, and which strategy divided the cost. Its per-member
//! shares are stored as [`Split`] rows next to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ids::{ExpenseId, GroupId, MemberId};
use super::money::Money;

/// How an expense was divided, as stored on the expense record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Equal,
    Exact,
}

impl SplitType {
    /// Parse split type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "equal" | "even" => Some(Self::Equal),
            "exact" | "amounts" => Some(Self::Exact),
            _ => None,
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

/// Split strategy input, carrying only what each variant needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Divide the amount evenly among the participants
    Equal,
    /// Caller-supplied share for every participant, in minor units
    Exact(BTreeMap<MemberId, Money>),
}

impl SplitStrategy {
    pub fn split_type(&self) -> SplitType {
        match self {
            Self::Equal => SplitType::Equal,
            Self::Exact(_) => SplitType::Exact,
        }
    }
}

/// One participant's share of an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub expense_id: ExpenseId,

    pub member_id: MemberId,

    /// Share owed by this member, never negative
    pub amount: Money,
}

impl Split {
    pub fn new(expense_id: ExpenseId, member_id: MemberId, amount: Money) -> Self {
        Self {
            expense_id,
            member_id,
            amount,
        }
    }
}

/// An immutable spending event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    pub group_id: GroupId,

    /// Member who fronted the money
    pub paid_by: MemberId,

    /// Total, strictly positive
    pub amount: Money,

    pub description: String,

    pub split_type: SplitType,

    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        group_id: GroupId,
        paid_by: MemberId,
        amount: Money,
        description: impl Into<String>,
        split_type: SplitType,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            group_id,
            paid_by,
            amount,
            description: description.into(),
            split_type,
            created_at: Utc::now(),
        }
    }

    /// Validate the expense together with its split rows
    pub fn validate(&self, splits: &[Split]) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }

        if splits.is_empty() {
            return Err(ExpenseValidationError::NoSplits);
        }

        for (i, split) in splits.iter().enumerate() {
            if split.expense_id != self.id {
                return Err(ExpenseValidationError::ForeignSplit(split.member_id));
            }
            if split.amount.is_negative() {
                return Err(ExpenseValidationError::NegativeShare(split.member_id));
            }
            if splits[..i].iter().any(|s| s.member_id == split.member_id) {
                return Err(ExpenseValidationError::DuplicateParticipant(split.member_id));
            }
        }

        let splits_total = Money::checked_sum(splits.iter().map(|s| s.amount))
            .ok_or(ExpenseValidationError::SplitsOverflow)?;
        if splits_total != self.amount {
            return Err(ExpenseValidationError::SplitsMismatch {
                expense_amount: self.amount,
                splits_total,
            });
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.created_at.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount(Money),
    EmptyDescription,
    NoSplits,
    ForeignSplit(MemberId),
    NegativeShare(MemberId),
    DuplicateParticipant(MemberId),
    SplitsMismatch {
        expense_amount: Money,
        splits_total: Money,
    },
    SplitsOverflow,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be positive, got {}", amount)
            }
            Self::EmptyDescription => write!(f, "Expense description cannot be empty"),
            Self::NoSplits => write!(f, "Expense has no participants"),
            Self::ForeignSplit(member) => {
                write!(f, "Split for {} belongs to another expense", member)
            }
            Self::NegativeShare(member) => write!(f, "Share for {} is negative", member),
            Self::DuplicateParticipant(member) => {
                write!(f, "{} appears more than once", member)
            }
            Self::SplitsMismatch {
                expense_amount,
                splits_total,
            } => write!(
                f,
                "Split totals ({}) do not match expense amount ({})",
                splits_total, expense_amount
            ),
            Self::SplitsOverflow => write!(f, "Split totals exceed the largest amount"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
