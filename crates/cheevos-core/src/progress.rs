//! # Progress Store
//!
//! The per-block counter sequence, index-aligned with the catalog.
//!
//! - Reads past the end return 0
//! - Writes past the end grow the sequence with zero-filled gaps
//! - The stored form is produced by the save codec

use crate::formats::{decode_save, encode_save};
use crate::{BlockIndex, CheevoError};

/// Ordered counters, one slot per registered block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressStore {
    values: Vec<u64>,
}

impl ProgressStore {
    /// Create an empty store (the never-saved state).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from explicit counters.
    #[must_use]
    pub fn from_values(values: Vec<u64>) -> Self {
        Self { values }
    }

    /// Decode a stored save string.
    pub fn load(stored: &str) -> Result<Self, CheevoError> {
        decode_save(stored).map(Self::from_values)
    }

    /// Decode a stored save string, starting from zero if it is corrupt.
    ///
    /// Losing progress is preferable to refusing to start.
    #[must_use]
    pub fn load_or_reset(stored: &str) -> Self {
        match Self::load(stored) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable achievement save");
                Self::new()
            }
        }
    }

    /// Encode the current counters into their stored form.
    #[must_use]
    pub fn snapshot(&self) -> String {
        encode_save(&self.values)
    }

    /// Counter for `index`, 0 if the slot was never written.
    #[must_use]
    pub fn get(&self, index: BlockIndex) -> u64 {
        self.values.get(index.value()).copied().unwrap_or(0)
    }

    /// Set the counter for `index`, growing the sequence as needed.
    pub fn set(&mut self, index: BlockIndex, value: u64) {
        self.ensure_len(index.value().saturating_add(1));
        if let Some(slot) = self.values.get_mut(index.value()) {
            *slot = value;
        }
    }

    /// Grow to at least `len` slots. Never shrinks.
    pub fn ensure_len(&mut self, len: usize) {
        if self.values.len() < len {
            self.values.resize(len, 0);
        }
    }

    /// Reset every counter to zero, keeping the slot count.
    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0);
    }

    /// Number of slots held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no slot has ever been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw counters.
    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        &self.values
    }
}

// =============================================================================
// TESTS
// =============================================================================
