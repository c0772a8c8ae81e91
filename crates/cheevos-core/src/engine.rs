//! # Engine
//!
//! The context object owning the catalog, the progress store, the settings
//! store and the notifier. The host builds one at start-up, registers its
//! blocks in a fixed order and then records progress as its triggers fire.
//!
//! ## Persistence
//!
//! Every `record_progress` call that changes state is followed by a save
//! unless the call happens inside `batch`. Saves are fire-and-forget: a
//! failed write is logged and reported on the `RecordOutcome`, the in-memory
//! counters stay authoritative. `flush` is the explicit, checked write.
//!
//! ## Concurrency
//!
//! Mutation goes through `&mut self`, so each read-modify-write-persist
//! sequence is atomic. Hosts with real parallelism share the engine behind
//! a single lock.

use crate::catalog::Catalog;
use crate::evaluator::UnlockEvaluator;
use crate::notifier::{LogNotifier, Notifier};
use crate::primitives::{DEFAULT_DELTA, LAST_SEEN_KEY, SAVE_KEY};
use crate::progress::ProgressStore;
use crate::settings::SettingsStore;
use crate::{Block, BlockIndex, CheevoError, RecordOutcome};
use serde::{Deserialize, Serialize};

// =============================================================================
// REPORTING TYPES
// =============================================================================

/// One threshold together with its current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub block: usize,
    pub threshold: usize,
    pub label: String,
    pub description: String,
    pub target: u64,
    pub progress: u64,
    pub unlocked: bool,
}

/// Catalog length against persisted slot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consistency {
    /// Blocks registered in this process.
    pub catalog_blocks: usize,
    /// Slots found in the save string at start-up.
    pub persisted_slots: usize,
}

impl Consistency {
    /// A save may be shorter than the catalog (new achievements) but a
    /// longer one means blocks were removed or reordered.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.persisted_slots <= self.catalog_blocks
    }
}

/// Aggregate counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub blocks: usize,
    pub thresholds: usize,
    pub unlocked: usize,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Achievement tracking engine.
pub struct Engine {
    catalog: Catalog,
    progress: ProgressStore,
    settings: Box<dyn SettingsStore>,
    notifier: Box<dyn Notifier>,
    persisted_slots: usize,
    batching: bool,
    dirty: bool,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("blocks", &self.catalog.block_count())
            .field("progress", &self.progress.as_slice())
            .field("batching", &self.batching)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Load progress from `settings` and build an engine with an empty catalog.
    ///
    /// A corrupt save is discarded with a warning. A settings read failure
    /// is returned.
    pub fn load(settings: impl SettingsStore + 'static) -> Result<Self, CheevoError> {
        let stored = settings.get(SAVE_KEY)?.unwrap_or_default();
        let progress = ProgressStore::load_or_reset(&stored);
        let persisted_slots = progress.len();

        tracing::debug!(slots = persisted_slots, "Loaded achievement progress");

        Ok(Self {
            catalog: Catalog::new(),
            progress,
            settings: Box::new(settings),
            notifier: Box::new(LogNotifier),
            persisted_slots,
            batching: false,
            dirty: false,
        })
    }

    /// Replace the notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Register a graduated series. See [`Catalog::register_series`].
    pub fn register_series<L, F>(
        &mut self,
        labels: &[L],
        template: &str,
        targets: &[u64],
        on_register: F,
    ) -> Result<BlockIndex, CheevoError>
    where
        L: AsRef<str>,
        F: FnOnce(BlockIndex),
    {
        let index = self
            .catalog
            .register_series(labels, template, targets, on_register)?;
        self.progress.ensure_len(self.catalog.block_count());
        self.saturate_slot(index);
        Ok(index)
    }

    /// Register a one-shot achievement.
    pub fn register<F>(
        &mut self,
        label: &str,
        description: &str,
        on_register: F,
    ) -> Result<BlockIndex, CheevoError>
    where
        F: FnOnce(BlockIndex),
    {
        self.register_target(label, description, 1, on_register)
    }

    /// Register a single achievement unlocking at `target`.
    pub fn register_target<F>(
        &mut self,
        label: &str,
        description: &str,
        target: u64,
        on_register: F,
    ) -> Result<BlockIndex, CheevoError>
    where
        F: FnOnce(BlockIndex),
    {
        self.register_series(&[label], description, &[target], on_register)
    }

    /// Clamp a saved counter to its block's highest target.
    ///
    /// Saves written by an older catalog, or imported by hand, can hold more
    /// than the block now allows.
    fn saturate_slot(&mut self, index: BlockIndex) {
        let Some(max) = self.catalog.block(index).map(Block::max_target) else {
            return;
        };
        let stored = self.progress.get(index);
        if stored > max {
            tracing::warn!(
                block = index.value(),
                stored,
                max,
                "Saved counter exceeds highest target; clamping"
            );
            self.progress.set(index, max);
        }
    }

    /// Compare the registered catalog with the loaded save.
    ///
    /// Logs on mismatch, never fails.
    pub fn check_consistency(&self) -> Consistency {
        let report = Consistency {
            catalog_blocks: self.catalog.block_count(),
            persisted_slots: self.persisted_slots,
        };
        if report.is_consistent() {
            tracing::debug!(
                catalog_blocks = report.catalog_blocks,
                persisted_slots = report.persisted_slots,
                "Achievement save matches catalog"
            );
        } else {
            tracing::warn!(
                catalog_blocks = report.catalog_blocks,
                persisted_slots = report.persisted_slots,
                "Achievement save has more slots than registered blocks; progress may be misattributed"
            );
        }
        report
    }

    // =========================================================================
    // PROGRESS
    // =========================================================================

    /// Record one occurrence for `block`.
    pub fn record(&mut self, block: BlockIndex) -> Result<RecordOutcome, CheevoError> {
        self.record_progress(block, DEFAULT_DELTA)
    }

    /// Add `delta` to `block`'s counter and publish newly crossed thresholds.
    ///
    /// # Errors
    ///
    /// `CheevoError::InvalidArgument` for a negative delta or an unregistered
    /// block; state is untouched in both cases. Write failures are not
    /// errors, see [`RecordOutcome::persist_warning`].
    pub fn record_progress(
        &mut self,
        block: BlockIndex,
        delta: i64,
    ) -> Result<RecordOutcome, CheevoError> {
        let delta = UnlockEvaluator::checked_delta(delta)?;
        let entry = self.catalog.block(block).ok_or_else(|| {
            CheevoError::InvalidArgument(format!("Block {} is not registered", block))
        })?;

        if delta == 0 {
            return Ok(RecordOutcome::default());
        }

        let old_value = self.progress.get(block);
        let evaluation = UnlockEvaluator::evaluate(entry, old_value, delta);
        if !evaluation.changed() {
            // Already saturated: nothing to store or announce.
            return Ok(RecordOutcome::default());
        }
        self.progress.set(block, evaluation.new_value);

        for event in &evaluation.events {
            self.notifier.notify(event);
        }

        let persist_warning = if self.batching {
            self.dirty = true;
            None
        } else {
            self.persist().err().map(|e| e.to_string())
        };

        Ok(RecordOutcome {
            events: evaluation.events,
            persist_warning,
        })
    }

    /// Run `f` with per-call saves suspended, then save once.
    ///
    /// The closing save is checked; its error is returned.
    pub fn batch<T, F>(&mut self, f: F) -> Result<T, CheevoError>
    where
        F: FnOnce(&mut Self) -> T,
    {
        let outer = self.batching;
        self.batching = true;
        let result = f(self);
        self.batching = outer;

        if !outer && self.dirty {
            self.flush()?;
        }
        Ok(result)
    }

    /// Write the current counters and wait for the write to finish.
    pub fn flush(&mut self) -> Result<(), CheevoError> {
        let snapshot = self.progress.snapshot();
        self.settings.set(SAVE_KEY, &snapshot)?;
        self.dirty = false;
        Ok(())
    }

    fn persist(&mut self) -> Result<(), CheevoError> {
        self.flush().inspect_err(|e| {
            self.dirty = true;
            tracing::warn!(error = %e, "Failed to save achievement progress");
        })
    }

    /// Replace all progress with a save string, then write it.
    ///
    /// Unlike start-up loading, a corrupt string is an error here and the
    /// current progress is kept.
    pub fn import_save(&mut self, stored: &str) -> Result<(), CheevoError> {
        let mut progress = ProgressStore::load(stored)?;
        progress.ensure_len(self.catalog.block_count());
        self.progress = progress;
        for index in (0..self.catalog.block_count()).map(BlockIndex) {
            self.saturate_slot(index);
        }
        self.flush()
    }

    /// Zero every counter and write the result.
    pub fn reset(&mut self) -> Result<(), CheevoError> {
        self.progress.clear();
        self.flush()
    }

    // =========================================================================
    // LAST SEEN
    // =========================================================================

    /// Stored last start-up time in milliseconds since the epoch.
    ///
    /// An unreadable value is treated as never seen.
    pub fn last_seen(&self) -> Result<Option<u64>, CheevoError> {
        let raw = self.settings.get(LAST_SEEN_KEY)?;
        Ok(raw.and_then(|v| match v.trim().parse::<u64>() {
            Ok(ms) => Some(ms),
            Err(e) => {
                tracing::warn!(value = %v, error = %e, "Ignoring unreadable lastSeen");
                None
            }
        }))
    }

    /// Store `now_ms` as the last start-up time, returning the previous one.
    pub fn touch_last_seen(&mut self, now_ms: u64) -> Result<Option<u64>, CheevoError> {
        let previous = self.last_seen()?;
        self.settings.set(LAST_SEEN_KEY, &now_ms.to_string())?;
        Ok(previous)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// The registered catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The in-memory counters.
    #[must_use]
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    /// Counter for `block` (0 past the end).
    #[must_use]
    pub fn get(&self, block: BlockIndex) -> u64 {
        self.progress.get(block)
    }

    /// Current counters in stored form.
    #[must_use]
    pub fn snapshot(&self) -> String {
        self.progress.snapshot()
    }

    /// Whether changes are waiting for a save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Aggregate counts.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary {
            blocks: self.catalog.block_count(),
            thresholds: self.catalog.threshold_total(),
            unlocked: self.catalog.unlocked_count(&self.progress),
        }
    }

    /// Every threshold with its progress, in catalog order.
    #[must_use]
    pub fn statuses(&self) -> Vec<AchievementStatus> {
        self.catalog
            .blocks()
            .iter()
            .flat_map(|block| {
                let value = self.progress.get(block.index);
                block
                    .thresholds
                    .iter()
                    .enumerate()
                    .map(move |(position, t)| AchievementStatus {
                        block: block.index.value(),
                        threshold: position,
                        label: t.plain_label(),
                        description: t.description.clone(),
                        target: t.target,
                        progress: value.min(t.target),
                        unlocked: t.is_reached_by(value),
                    })
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
