//! Timed-wait abstraction for the emitter.
//!
//! The emitter never sleeps directly; it suspends through a `DelaySource`,
//! so the same playback loop runs against the tokio clock in production
//! and a mock or paused clock in tests.

use std::future::Future;
use std::time::Duration;

/// Source of timed suspensions.
///
/// Implementors only provide the plain wait; cancellation is layered on
/// top by the emitter, which races the wait against its cancel signal.
pub trait DelaySource: Send + 'static {
    /// Suspend the calling task for `duration`.
    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production delay source backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

impl DelaySource for TokioDelay {
    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
