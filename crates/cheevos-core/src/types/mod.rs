//! # Core Type Definitions
//!
//! This module contains the shared types of the achievement engine:
//! - Block identifiers (`BlockIndex`)
//! - Catalog entries (`Threshold`, `Block`)
//! - Engine output (`UnlockEvent`, `RecordOutcome`)
//! - Error types (`CheevoError`)
//!
//! ## Counter Guarantees
//!
//! - Counters are `u64` and use saturating arithmetic
//! - A counter never exceeds the highest target of its block
//! - A threshold unlocks at most once per crossing

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// BLOCK IDENTIFIER
// =============================================================================

/// Position of a block in the catalog.
///
/// There is no other identity: the index is assigned by registration order
/// and is what the persisted save string is keyed on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct BlockIndex(pub usize);

impl BlockIndex {
    /// Get the raw slot position.
    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// THRESHOLD
// =============================================================================

/// One graduated reward level within a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    /// Display label. May contain inline markup such as a link.
    pub label: String,
    /// Description with the `{0}` placeholder already resolved.
    pub description: String,
    /// Counter value at which this threshold unlocks (always >= 1).
    pub target: u64,
}

impl Threshold {
    /// Create a threshold, resolving every placeholder in `template` to `target`.
    #[must_use]
    pub fn new(label: impl Into<String>, template: &str, target: u64) -> Self {
        Self {
            label: label.into(),
            description: resolve_description(template, target),
            target,
        }
    }

    /// The label with markup tags removed.
    ///
    /// Falls back to the raw label when stripping leaves nothing visible.
    #[must_use]
    pub fn plain_label(&self) -> String {
        let stripped = strip_markup(&self.label);
        if stripped.trim().is_empty() {
            self.label.clone()
        } else {
            stripped
        }
    }

    /// Whether a counter at `value` satisfies this threshold.
    #[must_use]
    pub const fn is_reached_by(&self, value: u64) -> bool {
        value >= self.target
    }
}

/// Replace every `{0}` in `template` with `target`.
#[must_use]
pub fn resolve_description(template: &str, target: u64) -> String {
    template.replace(crate::primitives::TARGET_PLACEHOLDER, &target.to_string())
}

/// Drop everything between `<` and `>`.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

// =============================================================================
// BLOCK
// =============================================================================

/// A group of thresholds sharing one progress counter.
///
/// A block with one threshold is a one-shot achievement; several thresholds
/// form a graduated series. Thresholds are expected in ascending target order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The block's position in the catalog.
    pub index: BlockIndex,
    /// Thresholds in registration order. Never empty.
    pub thresholds: Vec<Threshold>,
}

impl Block {
    /// Highest target in the block; the counter saturates here.
    #[must_use]
    pub fn max_target(&self) -> u64 {
        self.thresholds.iter().map(|t| t.target).max().unwrap_or(0)
    }

    /// Whether thresholds are registered in ascending target order.
    #[must_use]
    pub fn is_ascending(&self) -> bool {
        self.thresholds.windows(2).all(|w| w[0].target <= w[1].target)
    }

    /// Number of thresholds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// True for a block without thresholds (never produced by the catalog).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

// =============================================================================
// UNLOCK EVENT
// =============================================================================

/// Emitted exactly once when a block's counter first reaches a threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockEvent {
    /// Block whose counter crossed the target.
    pub block: BlockIndex,
    /// Position of the threshold inside the block.
    pub threshold: usize,
    /// Label with markup stripped.
    pub label: String,
    /// Resolved description.
    pub description: String,
}

impl UnlockEvent {
    /// Build the event for threshold `threshold` of `block`.
    #[must_use]
    pub fn new(block: BlockIndex, threshold: usize, entry: &Threshold) -> Self {
        Self {
            block,
            threshold,
            label: entry.plain_label(),
            description: entry.description.clone(),
        }
    }
}

/// Result of one `record_progress` call.
///
/// Persistence is fire-and-forget: a failed write does not undo the
/// in-memory counter, it is reported here instead.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordOutcome {
    /// Newly unlocked thresholds, in threshold order.
    pub events: Vec<UnlockEvent>,
    /// Set when the save could not be written.
    pub persist_warning: Option<String>,
}

impl RecordOutcome {
    /// Whether this call unlocked anything.
    #[must_use]
    pub fn unlocked_any(&self) -> bool {
        !self.events.is_empty()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the achievement engine.
///
/// - No silent failures
/// - Use `Result<T, CheevoError>` for fallible operations
/// - The engine never panics; all errors are recoverable
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheevoError {
    /// The persisted save string does not decode into a counter sequence.
    #[error("Corrupt save state: {0}")]
    CorruptState(String),

    /// The caller violated an engine precondition.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The settings store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A catalog definition could not be loaded.
    #[error("Config error: {0}")]
    Config(String),
}

// =============================================================================
// TESTS
// =============================================================================
