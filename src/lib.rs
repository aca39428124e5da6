//! splitledger - shared-expense ledger for groups
//!
//! Records who paid for what inside a group, divides each expense among its
//! participants down to the last minor unit, and derives every member's
//! balance from an append-only ledger whose entries always net to zero.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, groups, expenses, ledger entries)
//! - `storage`: JSON file storage with atomic multi-row commits
//! - `services`: Split calculation, ledger engine, balances
//! - `audit`: Audit logging system
//! - `cli`, `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,no_run
//! use splitledger::config::{LedgerPaths, Settings};
//! use splitledger::storage::Storage;
//! use splitledger::services::BalanceService;
//!
//! # fn main() -> Result<(), splitledger::LedgerError> {
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! if let Some(group) = storage.groups.get_by_name("Flat 4B")? {
//!     let balances = BalanceService::new(&storage).balances_for(group.id)?;
//!     for balance in &balances.balances {
//!         println!("{}", balance.amount.format_with_symbol(&settings.currency_symbol));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
