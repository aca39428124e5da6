//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod balance;
pub mod expense;
pub mod group;

pub use audit::handle_audit_command;
pub use balance::handle_balance_command;
pub use expense::{handle_expense_command, ExpenseCommands};
pub use group::{handle_group_command, GroupCommands};
