//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for groups, expenses and balances.

pub mod balance;
pub mod expense;
pub mod group;

pub use balance::format_balances;
pub use expense::{format_expense_details, format_expense_list};
pub use group::{format_group_details, format_group_list};
