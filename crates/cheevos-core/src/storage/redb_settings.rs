//! # redb-backed Settings Storage
//!
//! A single `settings` table mapping setting name to string value.
//!
//! redb provides:
//! - ACID transactions (each `set` commits on its own)
//! - Crash safety (copy-on-write B-trees)
//! - Zero configuration

use crate::CheevoError;
use crate::settings::SettingsStore;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;

/// Table for settings: key string -> value string
const SETTINGS: TableDefinition<&str, &str> = TableDefinition::new("settings");

/// Settings persisted in a redb database file.
pub struct RedbSettings {
    db: Database,
}

impl std::fmt::Debug for RedbSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbSettings").finish_non_exhaustive()
    }
}

fn storage_err(e: impl std::fmt::Display) -> CheevoError {
    CheevoError::Storage(e.to_string())
}

impl RedbSettings {
    /// Open or create a settings database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CheevoError> {
        let db = Database::create(path.as_ref()).map_err(storage_err)?;

        // Create the table up front so read transactions can always open it.
        let write_txn = db.begin_write().map_err(storage_err)?;
        {
            let _ = write_txn.open_table(SETTINGS).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;

        Ok(Self { db })
    }
}

impl SettingsStore for RedbSettings {
    fn get(&self, key: &str) -> Result<Option<String>, CheevoError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(SETTINGS).map_err(storage_err)?;
        let value = table
            .get(key)
            .map_err(storage_err)?
            .map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CheevoError> {
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = write_txn.open_table(SETTINGS).map_err(storage_err)?;
            table.insert(key, value).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
