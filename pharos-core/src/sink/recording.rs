//! `RecordingSink` — in-memory sink that logs every transition.
//!
//! Stands in for real hardware so the full engine can be exercised
//! end-to-end: tests assert on the recorded trajectory, and a fault can be
//! injected to drive the sink-failure path.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::Instant;

use super::{Level, OutputSink};
use crate::error::{PharosError, Result};

/// One recorded `set` call.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub level: Level,
    pub at: Instant,
}

/// In-memory sink. Clones share the same transition log, so a caller can
/// keep one handle while the engine owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    transitions: Arc<Mutex<Vec<Transition>>>,
    fail_after: Arc<Mutex<Option<usize>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `set` call after `writes` successful writes fail with
    /// [`PharosError::SinkWrite`].
    pub fn fail_after(&self, writes: usize) {
        *self.fail_after.lock() = Some(writes);
    }

    /// Snapshot of all recorded transitions, in order.
    pub fn transitions(&self) -> Vec<Transition> {
        self.transitions.lock().clone()
    }

    /// The recorded levels, in order.
    pub fn levels(&self) -> Vec<Level> {
        self.transitions
            .lock()
            .iter()
            .map(|transition| transition.level)
            .collect()
    }

    /// The most recently written level, if any.
    pub fn last_level(&self) -> Option<Level> {
        self.transitions
            .lock()
            .last()
            .map(|transition| transition.level)
    }
}

impl OutputSink for RecordingSink {
    fn set(&mut self, level: Level) -> Result<()> {
        let mut transitions = self.transitions.lock();

        if let Some(limit) = *self.fail_after.lock() {
            if transitions.len() >= limit {
                return Err(PharosError::SinkWrite("injected sink fault".into()));
            }
        }

        transitions.push(Transition {
            level,
            at: Instant::now(),
        });
        Ok(())
    }
}
