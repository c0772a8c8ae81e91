//! # Engine Scenario Tests
//!
//! End-to-end behaviour of registration, progress recording and persistence.
//!
//! ## Groups
//! - Unlocks: exactly-once, no double-fire, multi-crossing
//! - Persistence: saves, corrupt recovery, redb restart
//! - Positional identity: what happens when registration order changes

use cheevos_core::primitives::SAVE_KEY;
use cheevos_core::{
    BlockIndex, CheevoError, Engine, MemorySettings, RecordingNotifier, RedbSettings,
    SettingsStore, decode_save,
};
use tempfile::TempDir;

// =============================================================================
// UNLOCKS
// =============================================================================

mod unlocks {
    use super::*;

    #[test]
    fn large_delta_fires_every_threshold_in_order() {
        let mut engine = Engine::load(MemorySettings::new()).expect("load");
        let block = engine
            .register_series(&["t1", "t2", "t3"], "Did {0}", &[5, 10, 20], |_| {})
            .expect("register");

        let outcome = engine.record_progress(block, 20).expect("record");
        let labels: Vec<&str> = outcome.events.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["t1", "t2", "t3"]);

        let after = engine.record(block).expect("record");
        assert!(after.events.is_empty());
        assert_eq!(engine.get(block), 20);
    }

    #[test]
    fn no_double_fire_below_next_threshold() {
        let mut engine = Engine::load(MemorySettings::new()).expect("load");
        let block = engine
            .register_series(&["t1", "t2"], "", &[5, 10], |_| {})
            .expect("register");

        assert_eq!(engine.record_progress(block, 5).expect("record").events.len(), 1);
        assert!(engine.record_progress(block, 0).expect("record").events.is_empty());
        assert!(engine.record_progress(block, 4).expect("record").events.is_empty());
        assert_eq!(engine.get(block), 9);
    }

    #[test]
    fn single_threshold_at_index_two() {
        let mut engine = Engine::load(MemorySettings::new()).expect("load");
        engine.register("zero", "", |_| {}).expect("register");
        engine.register("one", "", |_| {}).expect("register");
        let block = engine
            .register_target("lucky", "Rolled a {0}", 7, |_| {})
            .expect("register");
        assert_eq!(block, BlockIndex(2));
        assert_eq!(engine.progress().as_slice(), &[0, 0, 0]);

        let outcome = engine.record_progress(block, 7).expect("record");

        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].block, BlockIndex(2));
        assert_eq!(outcome.events[0].description, "Rolled a 7");
        assert_eq!(engine.progress().as_slice(), &[0, 0, 7]);
        assert_eq!(decode_save(&engine.snapshot()).expect("decode"), vec![0, 0, 7]);
    }

    #[test]
    fn series_step_from_49() {
        // "49"
        let settings = MemorySettings::with_value(SAVE_KEY, "NDk=");
        let mut engine = Engine::load(settings).expect("load");
        let block = engine
            .register_series(
                &["too nice", "way too nice", "big softie"],
                "Approved {0} things",
                &[50, 200, 1000],
                |_| {},
            )
            .expect("register");
        assert_eq!(engine.get(block), 49);

        let outcome = engine.record(block).expect("record");

        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].threshold, 0);
        assert_eq!(outcome.events[0].label, "too nice");
        assert_eq!(engine.get(block), 50);
    }

    #[test]
    fn notifier_sees_plain_labels() {
        let recorder = RecordingNotifier::new();
        let mut engine = Engine::load(MemorySettings::new())
            .expect("load")
            .with_notifier(recorder.clone());
        let block = engine
            .register(
                r#"<a href="https://example.com" target="_blank">toolbox loves you</a>"#,
                "Looked at the about page. <3",
                |_| {},
            )
            .expect("register");

        engine.record(block).expect("record");

        let events = recorder.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].label, "toolbox loves you");
        assert_eq!(events[0].description, "Looked at the about page. <3");
    }
}

// =============================================================================
// PERSISTENCE
// =============================================================================

mod persistence {
    use super::*;

    #[test]
    fn every_record_saves() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("cheevos.db");

        {
            let mut engine = Engine::load(RedbSettings::open(&path).expect("open")).expect("load");
            let block = engine
                .register_target("a", "", 100, |_| {})
                .expect("register");
            for _ in 0..3 {
                let outcome = engine.record(block).expect("record");
                assert!(outcome.persist_warning.is_none());
            }
        }

        let settings = RedbSettings::open(&path).expect("reopen");
        let stored = settings.get(SAVE_KEY).expect("get").expect("saved");
        assert_eq!(decode_save(&stored).expect("decode"), vec![3]);
    }

    #[test]
    fn restart_keeps_unlocks_locked_in() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("cheevos.db");

        {
            let mut engine = Engine::load(RedbSettings::open(&path).expect("open")).expect("load");
            let block = engine.register("once", "", |_| {}).expect("register");
            assert_eq!(engine.record(block).expect("record").events.len(), 1);
        }

        let mut engine = Engine::load(RedbSettings::open(&path).expect("open")).expect("load");
        let block = engine.register("once", "", |_| {}).expect("register");
        assert!(engine.record(block).expect("record").events.is_empty());
        assert_eq!(engine.summary().unlocked, 1);
    }

    #[test]
    fn corrupt_save_starts_from_zero() {
        let settings = MemorySettings::with_value(SAVE_KEY, "this is not a save");
        let mut engine = Engine::load(settings).expect("load");
        let block = engine.register("a", "", |_| {}).expect("register");

        assert_eq!(engine.get(block), 0);
        assert_eq!(engine.record(block).expect("record").events.len(), 1);
    }

    #[test]
    fn unknown_block_is_an_error() {
        let mut engine = Engine::load(MemorySettings::new()).expect("load");
        assert!(matches!(
            engine.record(BlockIndex(0)),
            Err(CheevoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn loaded_counter_is_clamped_to_highest_target() {
        // "99"
        let settings = MemorySettings::with_value(SAVE_KEY, "OTk=");
        let mut engine = Engine::load(settings).expect("load");
        let block = engine.register_target("a", "", 9, |_| {}).expect("register");

        assert_eq!(engine.get(block), 9);

        let outcome = engine.record(block).expect("record");
        assert!(outcome.events.is_empty());
        assert_eq!(engine.get(block), 9);
    }

    #[test]
    fn imported_counter_is_clamped_to_highest_target() {
        let mut engine = Engine::load(MemorySettings::new()).expect("load");
        let block = engine.register_target("a", "", 9, |_| {}).expect("register");

        // "99"
        engine.import_save("OTk=").expect("import");

        assert_eq!(engine.get(block), 9);
        assert_eq!(decode_save(&engine.snapshot()).expect("decode"), vec![9]);
    }

    #[test]
    fn get_past_persisted_length_is_zero() {
        // "4"
        let settings = MemorySettings::with_value(SAVE_KEY, "NA==");
        let engine = Engine::load(settings).expect("load");
        assert_eq!(engine.get(BlockIndex(0)), 4);
        assert_eq!(engine.get(BlockIndex(9)), 0);
    }
}

// =============================================================================
// POSITIONAL IDENTITY
// =============================================================================

mod positional_identity {
    use super::*;

    /// Known fragility: swapping registration order hands old progress to
    /// the other block. Saves are positional, so this is expected.
    #[test]
    fn reordering_registrations_misattributes_progress() {
        let settings = MemorySettings::new();
        let mut first = Engine::load(settings).expect("load");
        let approvals = first
            .register_target("approvals", "", 1000, |_| {})
            .expect("register");
        first.register_target("mail", "", 1000, |_| {}).expect("register");
        first.record_progress(approvals, 42).expect("record");
        let saved = first.snapshot();

        let mut second =
            Engine::load(MemorySettings::with_value(SAVE_KEY, &saved)).expect("load");
        let mail = second.register_target("mail", "", 1000, |_| {}).expect("register");
        let approvals = second
            .register_target("approvals", "", 1000, |_| {})
            .expect("register");

        assert_eq!(second.get(mail), 42);
        assert_eq!(second.get(approvals), 0);
        assert!(second.check_consistency().is_consistent());
    }

    #[test]
    fn removed_block_is_reported() {
        // "1;2"
        let settings = MemorySettings::with_value(SAVE_KEY, "MTsy");
        let mut engine = Engine::load(settings).expect("load");
        engine.register("only", "", |_| {}).expect("register");

        assert!(!engine.check_consistency().is_consistent());
        // The orphaned slot is kept, not truncated.
        assert_eq!(decode_save(&engine.snapshot()).expect("decode"), vec![1, 2]);
    }
}
