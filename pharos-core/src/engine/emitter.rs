//! Token playback loop.
//!
//! ## Per token
//!
//! ```text
//! Dit          → sink high → wait 1u → sink low
//! Dah          → sink high → wait 3u → sink low
//! IntraGap     → wait 1u
//! InterCharGap → wait 3u
//! WordGap      → wait 7u
//! ```
//!
//! Cancellation is cooperative and observed only while suspended in a
//! wait. A cancelled wait forces the sink low (best effort) before the
//! run terminates, so the output device never stays energized. Sink write
//! failures propagate immediately: no retry, no further tokens, and the
//! sink is left in whatever state the failure produced.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tracing::debug;

use crate::{
    delay::DelaySource,
    encoder::Token,
    error::Result,
    events::SinkActivityEvent,
    sink::{Level, OutputSink},
    timing::Timing,
};

/// How an emission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionOutcome {
    /// Every token's delay elapsed.
    Completed,
    /// A cancellation request arrived mid-run; the sink was forced low.
    Cancelled,
}

/// All context one emission needs, passed as one struct so the spawned
/// task stays tidy.
pub struct EmissionContext {
    pub tokens: Vec<Token>,
    pub timing: Timing,
    pub activity_tx: broadcast::Sender<SinkActivityEvent>,
    pub seq: Arc<AtomicU64>,
    pub cancel_rx: watch::Receiver<bool>,
}

enum Wait {
    Elapsed,
    Cancelled,
}

/// Drive `sink` through `ctx.tokens` in order.
pub async fn run<S, D>(
    mut ctx: EmissionContext,
    sink: &mut S,
    delay: &mut D,
) -> Result<EmissionOutcome>
where
    S: OutputSink,
    D: DelaySource,
{
    let tokens = std::mem::take(&mut ctx.tokens);

    for token in tokens {
        let duration = ctx.timing.duration_of(token);

        if token.is_signal() {
            transition(sink, Level::High, &ctx)?;
            match wait(delay, &mut ctx.cancel_rx, duration).await {
                Wait::Elapsed => transition(sink, Level::Low, &ctx)?,
                Wait::Cancelled => return Ok(release(sink, &ctx)),
            }
        } else {
            match wait(delay, &mut ctx.cancel_rx, duration).await {
                Wait::Elapsed => {}
                Wait::Cancelled => return Ok(release(sink, &ctx)),
            }
        }
    }

    Ok(EmissionOutcome::Completed)
}

/// Write `level` to the sink and broadcast the transition.
fn transition<S: OutputSink>(sink: &mut S, level: Level, ctx: &EmissionContext) -> Result<()> {
    sink.set(level)?;
    let seq = ctx.seq.fetch_add(1, Ordering::SeqCst);
    let _ = ctx.activity_tx.send(SinkActivityEvent { seq, level });
    Ok(())
}

/// Cancellation cleanup: force the sink low. Best effort — a sink that
/// fails while being released cannot be helped further.
fn release<S: OutputSink>(sink: &mut S, ctx: &EmissionContext) -> EmissionOutcome {
    if sink.set(Level::Low).is_ok() {
        let seq = ctx.seq.fetch_add(1, Ordering::SeqCst);
        let _ = ctx.activity_tx.send(SinkActivityEvent {
            seq,
            level: Level::Low,
        });
    }
    debug!("emission cancelled, sink released");
    EmissionOutcome::Cancelled
}

/// Suspend for `duration`, racing the cancellation signal.
async fn wait<D: DelaySource>(
    delay: &mut D,
    cancel_rx: &mut watch::Receiver<bool>,
    duration: Duration,
) -> Wait {
    tokio::select! {
        _ = delay.sleep(duration) => Wait::Elapsed,
        _ = cancelled(cancel_rx) => Wait::Cancelled,
    }
}

/// Resolves once cancellation is requested. A closed channel (the engine
/// was dropped mid-run) counts as a cancellation request.
async fn cancelled(cancel_rx: &mut watch::Receiver<bool>) {
    let _ = cancel_rx.wait_for(|requested| *requested).await;
}
