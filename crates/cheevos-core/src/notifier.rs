//! # Notifier
//!
//! Sinks for unlock events. The engine hands every event to its notifier in
//! the order the evaluator produced them and does not care how they are
//! presented.

use crate::UnlockEvent;
use std::sync::{Arc, Mutex};

/// Heading shown with every unlock.
pub const UNLOCK_TITLE: &str = "Mod achievement unlocked!";

/// Receives unlock events.
pub trait Notifier: Send + Sync {
    /// Present one unlock to the user.
    fn notify(&self, event: &UnlockEvent);
}

/// Logs unlocks through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &UnlockEvent) {
        tracing::info!(
            block = event.block.value(),
            threshold = event.threshold,
            description = %event.description,
            "{}: {}",
            UNLOCK_TITLE,
            event.label
        );
    }
}

/// Collects unlocks so they can be inspected later.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<UnlockEvent>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far.
    #[must_use]
    pub fn events(&self) -> Vec<UnlockEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &UnlockEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
