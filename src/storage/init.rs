//! Storage initialization
//!
//! First-run setup: directories plus empty data files, so later reads find
//! well-formed documents.

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing data files are never overwritten.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<(), LedgerError> {
    paths.ensure_directories()?;

    if !paths.groups_file().exists() {
        write_json_atomic(paths.groups_file(), &serde_json::json!({ "groups": [] }))?;
    }

    if !paths.ledger_file().exists() {
        write_json_atomic(
            paths.ledger_file(),
            &serde_json::json!({ "expenses": [], "splits": [], "entries": [] }),
        )?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.groups_file().exists() || !paths.ledger_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{GroupRepository, LedgerRepository};
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();
        assert!(!needs_initialization(&paths));

        let groups = GroupRepository::new(paths.groups_file());
        groups.load().unwrap();
        assert_eq!(groups.count().unwrap(), 0);

        let ledger = LedgerRepository::new(paths.ledger_file());
        ledger.load().unwrap();
        assert_eq!(ledger.expense_count().unwrap(), 0);
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let groups = GroupRepository::new(paths.groups_file());
        groups.load().unwrap();
        groups
            .upsert_and_save(crate::models::Group::new("Trip", "Alice"))
            .unwrap();

        initialize_storage(&paths).unwrap();

        let reloaded = GroupRepository::new(paths.groups_file());
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 1);
    }
}
