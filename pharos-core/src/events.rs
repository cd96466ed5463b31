//! Event types broadcast to engine subscribers.
//!
//! | Event | Channel |
//! |-------|---------|
//! | `EmissionStatusEvent` | `PharosEngine::subscribe_status` |
//! | `SinkActivityEvent` | `PharosEngine::subscribe_activity` |
//!
//! All payloads serialize to camelCase JSON so a host process (GUI, IPC
//! bridge, log shipper) can forward them unchanged.

use serde::{Deserialize, Serialize};

use crate::sink::Level;

/// Current state of the engine's single emission slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmissionStatus {
    /// Engine created; no emission started yet.
    Idle,
    /// An emission task is driving the sink.
    Running,
    /// The last token's delay elapsed.
    Completed,
    /// A cancellation request terminated the run; the sink was forced low.
    Cancelled,
    /// The sink failed mid-run; the run stopped without cleanup guarantees.
    Error,
}

impl EmissionStatus {
    /// Terminal states — the emission slot is free again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EmissionStatus::Completed | EmissionStatus::Cancelled | EmissionStatus::Error
        )
    }
}

/// Emitted whenever the engine state changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionStatusEvent {
    pub status: EmissionStatus,
    /// Optional human-readable detail (e.g. the sink error message).
    pub detail: Option<String>,
}

/// Emitted on every sink transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkActivityEvent {
    /// Monotonically increasing event sequence number.
    pub seq: u64,
    /// The level the sink was just driven to.
    pub level: Level,
}
