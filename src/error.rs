//! Custom error types for splitledger
//!
//! A single error hierarchy built with thiserror. Callers distinguish input
//! problems (fix and resubmit) from storage failures (safe to retry) through
//! [`LedgerError::is_validation`] and [`LedgerError::is_retryable`].

use thiserror::Error;

use crate::models::expense::ExpenseValidationError;
use crate::models::group::GroupValidationError;
use crate::models::Money;

/// The main error type for splitledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Amount is zero, negative, or not expressible in whole minor units
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Participant set or split strategy input is malformed
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    /// Exact split amounts do not add up to the expense total
    #[error("Split amounts total {actual} but the expense is {expected}")]
    SplitMismatch { expected: Money, actual: Money },

    /// Storage failure during a write; nothing from the attempt survives
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Acting member is not allowed to act on the group
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors outside of the ledger commit path
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// General validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },
}

impl LedgerError {
    /// Create a "not found" error for groups
    pub fn group_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Group",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for members
    pub fn member_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Member",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the caller has to change its input before trying again
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidSplit(_)
                | Self::SplitMismatch { .. }
                | Self::Validation(_)
        )
    }

    /// Check if the whole operation may simply be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<ExpenseValidationError> for LedgerError {
    fn from(err: ExpenseValidationError) -> Self {
        match err {
            ExpenseValidationError::NonPositiveAmount(_)
            | ExpenseValidationError::SplitsOverflow => Self::InvalidAmount(err.to_string()),
            ExpenseValidationError::SplitsMismatch {
                expense_amount,
                splits_total,
            } => Self::SplitMismatch {
                expected: expense_amount,
                actual: splits_total,
            },
            ExpenseValidationError::EmptyDescription => Self::Validation(err.to_string()),
            _ => Self::InvalidSplit(err.to_string()),
        }
    }
}

impl From<GroupValidationError> for LedgerError {
    fn from(err: GroupValidationError) -> Self {
        match err {
            GroupValidationError::DuplicateMember(name) => Self::Duplicate {
                entity_type: "Member",
                identifier: name,
            },
            _ => Self::Validation(err.to_string()),
        }
    }
}

/// Result type alias for splitledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
