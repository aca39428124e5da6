//! Audit logging for splitledger
//!
//! Records every created group, member and expense, plus ledger writes that
//! were rolled back, in an append-only JSONL file next to the data.
//!
//! - `AuditEntry`: one logged operation with timestamp and entity snapshot
//! - `AuditLogger`: appends entries to the log and reads them back

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
