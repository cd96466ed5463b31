//! `PharosEngine` — top-level lifecycle controller.
//!
//! ## Lifecycle
//!
//! ```text
//! PharosEngine::new()                          status = Idle
//!     └─► emit(text)   → emitter task spawned, status = Running
//!         ├─► …          last token elapsed,   status = Completed
//!         ├─► cancel() → sink forced low,      status = Cancelled
//!         └─► sink fault → run stops,          status = Error
//! ```
//!
//! `emit()`/`cancel()` are guarded: calling them in the wrong state
//! returns an error rather than panicking. At most one emission runs at a
//! time — a fresh `emit()` while one is in flight is rejected with
//! `AlreadyRunning`, never queued or interleaved.
//!
//! ## Threading
//!
//! The engine is `Send + Sync` — all fields use interior mutability. Wrap
//! in `Arc<PharosEngine<_>>` to share between the caller requesting
//! emissions and event-forwarding tasks. The sink lives behind an async
//! mutex held for a run's whole duration, so the in-flight emission owns
//! the output exclusively.

pub mod emitter;

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use parking_lot::Mutex;
use tokio::sync::{broadcast, watch, Mutex as AsyncMutex};
use tracing::{info, warn};

use crate::{
    delay::TokioDelay,
    encoder,
    error::{PharosError, Result},
    events::{EmissionStatus, EmissionStatusEvent, SinkActivityEvent},
    sink::OutputSink,
    timing::Timing,
};

use self::emitter::{EmissionContext, EmissionOutcome};

/// Broadcast channel capacity: 256 events buffered for slow consumers.
const BROADCAST_CAP: usize = 256;

/// Configuration for `PharosEngine`.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Base-unit timing applied to every emission. Default: 100 ms/unit.
    pub timing: Timing,
}

/// The top-level engine handle.
pub struct PharosEngine<S> {
    config: EngineConfig,
    /// The output device, exclusively held by the in-flight emission.
    sink: Arc<AsyncMutex<S>>,
    /// `true` while an emission task is active.
    running: Arc<AtomicBool>,
    /// Canonical status (written atomically via Mutex, read from callers).
    status: Arc<Mutex<EmissionStatus>>,
    status_tx: broadcast::Sender<EmissionStatusEvent>,
    activity_tx: broadcast::Sender<SinkActivityEvent>,
    /// Monotonically increasing activity sequence counter.
    seq: Arc<AtomicU64>,
    /// Cancellation signal for the in-flight emission. Dropping the engine
    /// drops the sender, which the emitter treats as a cancel request.
    cancel_tx: Mutex<Option<watch::Sender<bool>>>,
}

impl<S: OutputSink> PharosEngine<S> {
    /// Create a new engine around `sink`. The caller hands the sink over
    /// already initialized to low and takes it back on teardown.
    pub fn new(config: EngineConfig, sink: S) -> Self {
        let (status_tx, _) = broadcast::channel(BROADCAST_CAP);
        let (activity_tx, _) = broadcast::channel(BROADCAST_CAP);

        Self {
            config,
            sink: Arc::new(AsyncMutex::new(sink)),
            running: Arc::new(AtomicBool::new(false)),
            status: Arc::new(Mutex::new(EmissionStatus::Idle)),
            status_tx,
            activity_tx,
            seq: Arc::new(AtomicU64::new(0)),
            cancel_tx: Mutex::new(None),
        }
    }

    /// Encode `text` and start emitting it on the engine's sink.
    ///
    /// Returns as soon as the emission task is spawned; subscribe to
    /// status events to observe completion. Must be called from within a
    /// tokio runtime.
    ///
    /// # Errors
    /// - `PharosError::AlreadyRunning` if an emission is in flight.
    pub fn emit(&self, text: &str) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(PharosError::AlreadyRunning);
        }

        let tokens = encoder::encode(text);
        info!(
            tokens = tokens.len(),
            expected = ?self.config.timing.total_duration(&tokens),
            "emission starting"
        );

        let (cancel_tx, cancel_rx) = watch::channel(false);
        *self.cancel_tx.lock() = Some(cancel_tx);

        self.set_status(EmissionStatus::Running, None);

        let ctx = EmissionContext {
            tokens,
            timing: self.config.timing,
            activity_tx: self.activity_tx.clone(),
            seq: Arc::clone(&self.seq),
            cancel_rx,
        };
        let sink = Arc::clone(&self.sink);
        let running = Arc::clone(&self.running);
        let status = Arc::clone(&self.status);
        let status_tx = self.status_tx.clone();

        tokio::spawn(async move {
            let mut sink = sink.lock().await;
            let mut delay = TokioDelay;
            let result = emitter::run(ctx, &mut *sink, &mut delay).await;
            drop(sink);

            let (new_status, detail) = match &result {
                Ok(EmissionOutcome::Completed) => {
                    info!("emission completed");
                    (EmissionStatus::Completed, None)
                }
                Ok(EmissionOutcome::Cancelled) => {
                    info!("emission cancelled");
                    (EmissionStatus::Cancelled, None)
                }
                Err(e) => {
                    warn!("emission failed: {e}");
                    (EmissionStatus::Error, Some(e.to_string()))
                }
            };

            // Free the slot before broadcasting, so a subscriber reacting
            // to the terminal event can emit again right away.
            running.store(false, Ordering::SeqCst);
            *status.lock() = new_status;
            let _ = status_tx.send(EmissionStatusEvent {
                status: new_status,
                detail,
            });
        });

        Ok(())
    }

    /// Request cancellation of the in-flight emission.
    ///
    /// Cooperative: the emitter observes the request at its next wait
    /// boundary and forces the sink low before terminating.
    ///
    /// # Errors
    /// - `PharosError::NotRunning` if no emission is in flight.
    pub fn cancel(&self) -> Result<()> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(PharosError::NotRunning);
        }

        if let Some(cancel_tx) = self.cancel_tx.lock().as_ref() {
            let _ = cancel_tx.send(true);
        }
        info!("emission cancel requested");
        Ok(())
    }

    /// Current status (snapshot).
    pub fn status(&self) -> EmissionStatus {
        *self.status.lock()
    }

    /// The timing this engine applies to emissions.
    pub fn timing(&self) -> Timing {
        self.config.timing
    }

    /// Subscribe to status change events.
    pub fn subscribe_status(&self) -> broadcast::Receiver<EmissionStatusEvent> {
        self.status_tx.subscribe()
    }

    /// Subscribe to sink transition events.
    pub fn subscribe_activity(&self) -> broadcast::Receiver<SinkActivityEvent> {
        self.activity_tx.subscribe()
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    fn set_status(&self, new_status: EmissionStatus, detail: Option<String>) {
        *self.status.lock() = new_status;
        let _ = self.status_tx.send(EmissionStatusEvent {
            status: new_status,
            detail,
        });
    }
}
