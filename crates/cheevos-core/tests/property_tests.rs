//! # Property-Based Tests
//!
//! Invariants of the save codec and the unlock evaluator, checked with
//! proptest.

use cheevos_core::{
    BlockIndex, Engine, MemorySettings, RecordingNotifier, decode_save, encode_save,
};
use proptest::collection::vec;
use proptest::prelude::*;

/// Ascending, distinct targets starting at 1.
fn ascending_targets() -> impl Strategy<Value = Vec<u64>> {
    vec(1u64..500, 1..6).prop_map(|mut targets| {
        targets.sort_unstable();
        targets.dedup();
        targets
    })
}

fn engine_with_series(targets: &[u64]) -> (Engine, BlockIndex, RecordingNotifier) {
    let recorder = RecordingNotifier::new();
    let mut engine = Engine::load(MemorySettings::new())
        .expect("load")
        .with_notifier(recorder.clone());
    let labels: Vec<String> = (0..targets.len()).map(|i| format!("level {}", i)).collect();
    let block = engine
        .register_series(&labels, "Reached {0}", targets, |_| {})
        .expect("register");
    (engine, block, recorder)
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// decode(encode(v)) == v for any counter sequence.
    #[test]
    fn save_roundtrip(values in vec(any::<u64>(), 0..64)) {
        let stored = encode_save(&values);
        prop_assert_eq!(decode_save(&stored).expect("decode"), values);
    }

    /// Repeated single steps never push a counter past the highest target.
    #[test]
    fn monotonic_saturation(targets in ascending_targets(), calls in 0usize..700) {
        let (mut engine, block, _) = engine_with_series(&targets);
        let max = *targets.last().expect("non-empty");

        let mut previous = 0;
        for _ in 0..calls {
            engine.record(block).expect("record");
            let current = engine.get(block);
            prop_assert!(current <= max);
            prop_assert!(current >= previous);
            previous = current;
        }
    }

    /// Every threshold fires exactly once, however progress is split up.
    #[test]
    fn each_threshold_fires_once(
        targets in ascending_targets(),
        deltas in vec(0i64..300, 0..40)
    ) {
        let (mut engine, block, recorder) = engine_with_series(&targets);

        for delta in &deltas {
            engine.record_progress(block, *delta).expect("record");
        }

        let total: u64 = deltas.iter().map(|&d| d as u64).sum();
        let expected = targets.iter().filter(|&&t| total >= t).count();
        let fired: Vec<usize> = recorder.events().iter().map(|e| e.threshold).collect();

        prop_assert_eq!(fired.len(), expected);
        let mut sorted = fired.clone();
        sorted.sort_unstable();
        prop_assert_eq!(fired, sorted);
    }

    /// Snapshot always decodes to the in-memory counters.
    #[test]
    fn snapshot_matches_progress(deltas in vec(0i64..50, 1..10)) {
        let (mut engine, block, _) = engine_with_series(&[10, 100]);
        for delta in deltas {
            engine.record_progress(block, delta).expect("record");
        }
        let decoded = decode_save(&engine.snapshot()).expect("decode");
        prop_assert_eq!(decoded.as_slice(), engine.progress().as_slice());
    }
}
