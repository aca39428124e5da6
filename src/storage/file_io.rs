//! File I/O utilities with atomic writes
//!
//! A file is either fully replaced or left untouched; readers never see a
//! half-written document. Writers that read-modify-write a file hold a
//! `FileLock` on it so that separate processes serialize their updates.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, LedgerError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| {
        LedgerError::Persistence(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        LedgerError::Persistence(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Persistence(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = path.with_extension("json.tmp");

    let result = write_temp(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| {
            LedgerError::Persistence(format!(
                "Failed to replace {}: {}",
                path.display(),
                e
            ))
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

/// Exclusive advisory lock guarding a data file, released on drop
///
/// The lock lives on a sibling `<name>.json.lock` file because the data file
/// itself is replaced by rename on every write.
#[derive(Debug)]
pub struct FileLock {
    file: File,
}

impl FileLock {
    /// Block until the lock for `path` is held
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let lock_path = lock_path_for(path.as_ref());

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LedgerError::Persistence(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                LedgerError::Persistence(format!(
                    "Failed to open lock file {}: {}",
                    lock_path.display(),
                    e
                ))
            })?;

        FileExt::lock_exclusive(&file).map_err(|e| {
            LedgerError::Persistence(format!("Failed to lock {}: {}", lock_path.display(), e))
        })?;

        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    path.with_extension("json.lock")
}

fn write_temp<T: Serialize>(temp_path: &Path, data: &T) -> Result<(), LedgerError> {
    let file = File::create(temp_path)
        .map_err(|e| LedgerError::Persistence(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| LedgerError::Persistence(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| LedgerError::Persistence(format!("Failed to flush data: {}", e)))?;

    // Data must be on disk before the rename publishes it
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| LedgerError::Persistence(format!("Failed to sync data: {}", e)))
}
