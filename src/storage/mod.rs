//! Storage layer for splitledger
//!
//! JSON file storage with atomic writes. Groups live in groups.json; the
//! ledger (expenses, splits, entries) lives in ledger.json so one file
//! replacement commits a whole expense.

pub mod file_io;
pub mod groups;
pub mod init;
pub mod ledger;

pub use file_io::{read_json, write_json_atomic};
pub use groups::GroupRepository;
pub use init::initialize_storage;
pub use ledger::{ExpenseBatch, LedgerRepository};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub groups: GroupRepository,
    pub ledger: LedgerRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            groups: GroupRepository::new(paths.groups_file()),
            ledger: LedgerRepository::new(paths.ledger_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), LedgerError> {
        self.groups.load()?;
        self.ledger.load()?;
        Ok(())
    }

    /// Record a created entity in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record a write that was undone
    pub fn log_rollback(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Result<(), LedgerError> {
        self.audit
            .log(&AuditEntry::rollback(entity_type, entity_id, reason))
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
