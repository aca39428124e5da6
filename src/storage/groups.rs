//! Group repository for JSON storage
//!
//! Manages loading and saving groups and their members to groups.json

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Group, GroupId};

use super::file_io::{read_json, write_json_atomic, FileLock};

/// Serializable group data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GroupData {
    groups: Vec<Group>,
}

fn read_groups(path: &Path) -> Result<HashMap<GroupId, Group>, LedgerError> {
    let file_data: GroupData = read_json(path)?;
    Ok(file_data.groups.into_iter().map(|g| (g.id, g)).collect())
}

fn write_groups(path: &Path, groups: &HashMap<GroupId, Group>) -> Result<(), LedgerError> {
    let mut groups: Vec<_> = groups.values().cloned().collect();
    groups.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    write_json_atomic(path, &GroupData { groups })
}

/// Repository for group and membership persistence
pub struct GroupRepository {
    path: PathBuf,
    data: RwLock<HashMap<GroupId, Group>>,
}

impl GroupRepository {
    /// Create a new group repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load groups from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let groups = read_groups(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire write lock: {}", e))
        })?;

        *data = groups;
        Ok(())
    }

    /// Apply a change to the current on-disk groups and persist the result
    ///
    /// The data file stays locked from the reload until the write, so
    /// changes made through other handles in the meantime are kept. When the
    /// change or the write fails, neither the file nor this handle changes.
    pub fn modify<T, F>(&self, change: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut HashMap<GroupId, Group>) -> Result<T, LedgerError>,
    {
        let _file_lock = FileLock::acquire(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire write lock: {}", e))
        })?;

        let mut groups = read_groups(&self.path)?;
        let result = change(&mut groups)?;
        write_groups(&self.path, &groups)?;

        *data = groups;
        Ok(result)
    }

    /// Get a group by ID
    pub fn get(&self, id: GroupId) -> Result<Option<Group>, LedgerError> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all groups, oldest first
    pub fn get_all(&self) -> Result<Vec<Group>, LedgerError> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut groups: Vec<_> = data.values().cloned().collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        Ok(groups)
    }

    /// Get a group by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Group>, LedgerError> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;

        let name = name.trim();
        Ok(data
            .values()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    /// Insert or update a group and persist it
    pub fn upsert_and_save(&self, group: Group) -> Result<(), LedgerError> {
        self.modify(|groups| {
            groups.insert(group.id, group);
            Ok(())
        })
    }

    /// Count groups
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self.data.read().map_err(|e| {
            LedgerError::Persistence(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}
