//! # cheevos-core
//!
//! The achievement tracking engine for Cheevos - THE ENGINE.
//!
//! A small persistent-counter system: named blocks of graduated thresholds
//! share one counter each, counters are saved as a compact text string, and
//! every threshold fires exactly one unlock event the first time its block's
//! counter reaches it.
//!
//! ## Components
//!
//! - `formats` → save string codec (Base64 of `;`-joined counters)
//! - `catalog` → ordered block registry
//! - `progress` → per-block counters
//! - `evaluator` → threshold-crossing detection and saturation
//! - `settings` / `storage` → key-value persistence seam (memory, redb)
//! - `notifier` → unlock event sinks
//! - `engine` → the context object tying them together
//!
//! ## Architectural Constraints
//!
//! - Block identity is registration order; the save string is positional
//! - Counters never exceed the highest target of their block
//! - NO async, NO network dependencies
//!
//! ## Example
//!
//! ```
//! use cheevos_core::{Engine, MemorySettings};
//!
//! let mut engine = Engine::load(MemorySettings::new()).expect("load");
//! let approvals = engine
//!     .register_series(&["too nice", "way too nice"], "Approved {0} things", &[50, 200], |_| {})
//!     .expect("register");
//!
//! let outcome = engine.record_progress(approvals, 50).expect("record");
//! assert_eq!(outcome.events.len(), 1);
//! assert_eq!(outcome.events[0].description, "Approved 50 things");
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod engine;
pub mod evaluator;
pub mod formats;
pub mod notifier;
pub mod primitives;
pub mod progress;
pub mod settings;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Block, BlockIndex, CheevoError, RecordOutcome, Threshold, UnlockEvent};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use catalog::Catalog;
pub use engine::{AchievementStatus, Consistency, Engine, Summary};
pub use evaluator::{Evaluation, UnlockEvaluator};
pub use notifier::{LogNotifier, Notifier, RecordingNotifier, UNLOCK_TITLE};
pub use progress::ProgressStore;
pub use settings::{MemorySettings, SettingsStore};
pub use storage::RedbSettings;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{decode_save, encode_save};
