//! Binary output sink abstraction.
//!
//! The `OutputSink` trait is the primary extensibility point: swap in a
//! GPIO-backed LED, a buzzer, a terminal cell (the demo app's sink), or
//! the in-tree [`RecordingSink`] without touching the emitter.
//!
//! Electrical setup and teardown stay with the caller: initialize the
//! device to low before handing it over, force it low on release.

pub mod recording;

pub use recording::RecordingSink;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The two states of the binary output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Low,
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

/// Trait for all output devices driven by the emitter.
///
/// `set` is assumed synchronous and fast relative to the timing unit. It
/// may fail (hardware fault); the emitter propagates the first failure,
/// drives no further tokens and leaves the sink in whatever state the
/// failure produced.
pub trait OutputSink: Send + 'static {
    fn set(&mut self, level: Level) -> Result<()>;
}
