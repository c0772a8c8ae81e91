//! # Unlock Evaluator
//!
//! Threshold-crossing detection for a single block.
//!
//! A threshold fires when the counter moves from below its target to at or
//! above it within one call. Thresholds already satisfied before the call
//! never fire again. After the scan the counter saturates at the block's
//! highest target.

use crate::{Block, CheevoError, UnlockEvent};

/// Outcome of applying one delta to a block's counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Counter before the delta.
    pub old_value: u64,
    /// Counter after the delta, saturated at the block's highest target.
    pub new_value: u64,
    /// Thresholds crossed by this delta, in registration order.
    pub events: Vec<UnlockEvent>,
}

impl Evaluation {
    /// Whether the stored counter changes.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.old_value != self.new_value
    }
}

/// Stateless evaluator applied by the engine.
pub struct UnlockEvaluator;

impl UnlockEvaluator {
    /// Validate a caller-supplied delta.
    ///
    /// Counters only move forward; negative deltas are rejected.
    pub fn checked_delta(delta: i64) -> Result<u64, CheevoError> {
        u64::try_from(delta).map_err(|_| {
            CheevoError::InvalidArgument(format!("Delta must be non-negative, got {}", delta))
        })
    }

    /// Apply `delta` to a counter currently at `old_value`.
    ///
    /// Pure: the caller stores `new_value` and publishes `events`.
    #[must_use]
    pub fn evaluate(block: &Block, old_value: u64, delta: u64) -> Evaluation {
        let raw = old_value.saturating_add(delta);

        let events: Vec<UnlockEvent> = block
            .thresholds
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_reached_by(raw) && !t.is_reached_by(old_value))
            .map(|(position, t)| UnlockEvent::new(block.index, position, t))
            .collect();

        let new_value = raw.min(block.max_target());

        tracing::debug!(
            block = block.index.value(),
            old_value,
            delta,
            new_value,
            unlocked = events.len(),
            "Evaluated achievement block"
        );

        Evaluation {
            old_value,
            new_value,
            events,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockIndex, Threshold};

    fn series(targets: &[u64]) -> Block {
        Block {
            index: BlockIndex(0),
            thresholds: targets
                .iter()
                .enumerate()
                .map(|(i, &t)| Threshold::new(format!("level {}", i), "Reached {0}", t))
                .collect(),
        }
    }

    #[test]
    fn single_crossing() {
        let block = series(&[50, 200, 1000]);
        let eval = UnlockEvaluator::evaluate(&block, 49, 1);
        assert_eq!(eval.new_value, 50);
        assert_eq!(eval.events.len(), 1);
        assert_eq!(eval.events[0].threshold, 0);
        assert_eq!(eval.events[0].description, "Reached 50");
    }

    #[test]
    fn multiple_crossings_in_order() {
        let block = series(&[1, 10, 100]);
        let eval = UnlockEvaluator::evaluate(&block, 0, 100);
        let positions: Vec<usize> = eval.events.iter().map(|e| e.threshold).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(eval.new_value, 100);
    }

    #[test]
    fn already_satisfied_does_not_refire() {
        let block = series(&[1, 10]);
        let eval = UnlockEvaluator::evaluate(&block, 1, 5);
        assert!(eval.events.is_empty());
        assert_eq!(eval.new_value, 6);
    }

    #[test]
    fn saturates_at_max_target() {
        let block = series(&[5]);
        let eval = UnlockEvaluator::evaluate(&block, 4, 1000);
        assert_eq!(eval.new_value, 5);
        assert_eq!(eval.events.len(), 1);

        let again = UnlockEvaluator::evaluate(&block, eval.new_value, 1);
        assert_eq!(again.new_value, 5);
        assert!(again.events.is_empty());
        assert!(!again.changed());
    }

    #[test]
    fn saturation_uses_highest_target_when_misordered() {
        let block = series(&[100, 10]);
        let eval = UnlockEvaluator::evaluate(&block, 0, 500);
        assert_eq!(eval.new_value, 100);
        assert_eq!(eval.events.len(), 2);
    }

    #[test]
    fn zero_delta_is_noop() {
        let block = series(&[3]);
        let eval = UnlockEvaluator::evaluate(&block, 2, 0);
        assert!(eval.events.is_empty());
        assert!(!eval.changed());
    }

    #[test]
    fn overflow_saturates() {
        let block = series(&[u64::MAX]);
        let eval = UnlockEvaluator::evaluate(&block, u64::MAX - 1, u64::MAX);
        assert_eq!(eval.new_value, u64::MAX);
        assert_eq!(eval.events.len(), 1);
    }

    #[test]
    fn negative_delta_rejected() {
        assert!(matches!(
            UnlockEvaluator::checked_delta(-1),
            Err(CheevoError::InvalidArgument(_))
        ));
        assert_eq!(UnlockEvaluator::checked_delta(3).expect("delta"), 3);
    }
}
