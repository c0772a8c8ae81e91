//! # Achievement Catalog
//!
//! Ordered registry of achievement blocks.
//!
//! Registration order is the only identity a block has: the n-th block
//! registered owns slot n of the persisted progress sequence. Reordering
//! registrations therefore reassigns existing progress to different
//! achievements. The catalog is populated once at start-up and is read-only
//! afterwards.
//!
//! Thresholds inside a series are expected in ascending target order. The
//! catalog does not reorder them; a misordered series is accepted with a
//! warning.

use crate::primitives::{MAX_DESCRIPTION_LENGTH, MAX_LABEL_LENGTH, MAX_SERIES_LENGTH};
use crate::progress::ProgressStore;
use crate::{Block, BlockIndex, CheevoError, Threshold};

/// The registry of blocks, indexed by registration order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    blocks: Vec<Block>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Register a graduated series sharing one counter.
    ///
    /// Every `{0}` in `template` is replaced by each threshold's target.
    /// `on_register` runs synchronously with the new block's index so the
    /// caller can wire its trigger to it.
    ///
    /// # Errors
    ///
    /// Returns `CheevoError::InvalidArgument` if:
    /// - `labels` is empty or its length differs from `targets`
    /// - any target is zero
    /// - a label or the template exceeds its length limit
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
        Self::validate_series(labels, template, targets)?;

        let index = BlockIndex(self.blocks.len());
        let thresholds: Vec<Threshold> = labels
            .iter()
            .zip(targets)
            .map(|(label, &target)| Threshold::new(label.as_ref(), template, target))
            .collect();

        let block = Block { index, thresholds };
        if !block.is_ascending() {
            tracing::warn!(
                block = index.value(),
                "Series targets are not ascending; saturation uses the highest target"
            );
        }

        tracing::debug!(
            block = index.value(),
            thresholds = block.len(),
            max_target = block.max_target(),
            "Registered achievement block"
        );

        self.blocks.push(block);
        on_register(index);
        Ok(index)
    }

    /// Register a one-shot achievement (target 1).
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

    /// Register a single achievement that unlocks at `target`.
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

    fn validate_series<L: AsRef<str>>(
        labels: &[L],
        template: &str,
        targets: &[u64],
    ) -> Result<(), CheevoError> {
        if labels.is_empty() {
            return Err(CheevoError::InvalidArgument(
                "A block needs at least one threshold".to_string(),
            ));
        }
        if labels.len() != targets.len() {
            return Err(CheevoError::InvalidArgument(format!(
                "{} labels but {} targets",
                labels.len(),
                targets.len()
            )));
        }
        if labels.len() > MAX_SERIES_LENGTH {
            return Err(CheevoError::InvalidArgument(format!(
                "Series of {} thresholds exceeds maximum {}",
                labels.len(),
                MAX_SERIES_LENGTH
            )));
        }
        if let Some(pos) = targets.iter().position(|&t| t == 0) {
            return Err(CheevoError::InvalidArgument(format!(
                "Threshold {} has target 0; targets start at 1",
                pos
            )));
        }
        if let Some(label) = labels
            .iter()
            .map(|l| l.as_ref())
            .find(|l| l.is_empty() || l.len() > MAX_LABEL_LENGTH)
        {
            return Err(CheevoError::InvalidArgument(format!(
                "Label length {} outside 1..={} bytes",
                label.len(),
                MAX_LABEL_LENGTH
            )));
        }
        if template.len() > MAX_DESCRIPTION_LENGTH {
            return Err(CheevoError::InvalidArgument(format!(
                "Description length {} exceeds maximum {} bytes",
                template.len(),
                MAX_DESCRIPTION_LENGTH
            )));
        }
        Ok(())
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Look up a block.
    #[must_use]
    pub fn block(&self, index: BlockIndex) -> Option<&Block> {
        self.blocks.get(index.value())
    }

    /// Look up a single threshold.
    #[must_use]
    pub fn threshold(&self, index: BlockIndex, position: usize) -> Option<&Threshold> {
        self.block(index).and_then(|b| b.thresholds.get(position))
    }

    /// All blocks in registration order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of registered blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of thresholds in one block (0 for an unknown block).
    #[must_use]
    pub fn threshold_count(&self, index: BlockIndex) -> usize {
        self.block(index).map_or(0, Block::len)
    }

    /// Number of thresholds across all blocks.
    #[must_use]
    pub fn threshold_total(&self) -> usize {
        self.blocks.iter().map(Block::len).sum()
    }

    /// Whether a threshold is unlocked under the given progress.
    ///
    /// Unknown blocks and thresholds are never unlocked.
    #[must_use]
    pub fn is_unlocked(&self, index: BlockIndex, position: usize, progress: &ProgressStore) -> bool {
        if index.value() >= progress.len() {
            return false;
        }
        self.threshold(index, position)
            .is_some_and(|t| t.is_reached_by(progress.get(index)))
    }

    /// Number of unlocked thresholds across the catalog.
    #[must_use]
    pub fn unlocked_count(&self, progress: &ProgressStore) -> usize {
        self.blocks
            .iter()
            .map(|block| {
                let value = progress.get(block.index);
                block
                    .thresholds
                    .iter()
                    .filter(|t| t.is_reached_by(value))
                    .count()
            })
            .sum()
    }
}

// =============================================================================
// TESTS
// =============================================================================
