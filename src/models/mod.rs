//! Core data models for splitledger
//!
//! Groups and their members, expenses with their per-member splits, and the
//! signed ledger entries every balance is derived from.

pub mod expense;
pub mod group;
pub mod ids;
pub mod ledger;
pub mod money;

pub use expense::{Expense, Split, SplitStrategy, SplitType};
pub use group::{Group, Member, MemberRole};
pub use ids::{EntryId, ExpenseId, GroupId, MemberId};
pub use ledger::{Balance, EntrySource, GroupBalances, LedgerEntry};
pub use money::{Money, MoneyParseError};
