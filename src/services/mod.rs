//! Service layer for splitledger
//!
//! Business logic on top of the storage layer: share computation, ledger
//! entry derivation, the atomic expense write and balance reads.

pub mod balance;
pub mod expense;
pub mod group;
pub mod ledger;
pub mod split;

pub use balance::{aggregate, BalanceService};
pub use expense::{CreateExpenseInput, ExpenseDetails, ExpenseService};
pub use group::GroupService;
pub use ledger::{build_entries, LedgerService};
pub use split::{Share, SplitCalculator};
