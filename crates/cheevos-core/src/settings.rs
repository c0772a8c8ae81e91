//! # Settings Store
//!
//! The key-value seam through which the engine persists its save string.
//!
//! The engine only ever needs "get a string by key" and "set a string by
//! key". Two stores ship with the crate:
//! - `MemorySettings`: volatile `BTreeMap`, for tests and dry runs
//! - `RedbSettings` (in `storage`): disk-backed, ACID

use crate::CheevoError;
use std::collections::BTreeMap;

/// Scalar string storage keyed by setting name.
///
/// Implementations must be `Send + Sync` so an engine can be shared behind
/// a lock by the HTTP host.
pub trait SettingsStore: Send + Sync {
    /// Read a value. `Ok(None)` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, CheevoError>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CheevoError>;
}

/// In-memory settings.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
}

impl MemorySettings {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one value.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = BTreeMap::new();
        values.insert(key.to_string(), value.to_string());
        Self { values }
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Result<Option<String>, CheevoError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CheevoError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
