//! Configuration module for splitledger
//!
//! - data directory resolution
//! - persisted user settings (currency symbol, split policies)

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::{RemainderPolicy, Settings};
