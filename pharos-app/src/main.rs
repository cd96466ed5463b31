//! Pharos terminal demo entry point.
//!
//! Thin caller around `pharos-core`: it owns the sink's acquisition and
//! teardown, requests one emission, and forwards Ctrl-C as a cancellation
//! request. Logs go to stderr so the lamp cell on stdout stays intact.

mod sink;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use pharos_core::{EngineConfig, PharosEngine, Timing};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sink::TerminalSink;

/// Blink a message in Morse code on a terminal LED.
#[derive(Debug, Parser)]
#[command(name = "pharos", version, about)]
struct Args {
    /// Message to emit.
    message: String,

    /// Base unit in milliseconds; all element durations are fixed
    /// multiples of it.
    #[arg(long, default_value_t = 100)]
    unit_ms: u64,

    /// Print engine events as JSON lines on stderr.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let timing = Timing::new(Duration::from_millis(args.unit_ms));
    let engine = PharosEngine::new(EngineConfig { timing }, TerminalSink::new()?);

    let mut status_rx = engine.subscribe_status();

    if args.json {
        let mut activity_rx = engine.subscribe_activity();
        tokio::spawn(async move {
            while let Ok(event) = activity_rx.recv().await {
                match serde_json::to_string(&event) {
                    Ok(line) => eprintln!("{line}"),
                    Err(e) => warn!("activity event serialization failed: {e}"),
                }
            }
        });
    }

    engine.emit(&args.message)?;

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                // A request that arrives after the run already ended is
                // logged and ignored, never queued.
                if let Err(e) = engine.cancel() {
                    warn!("cancel request ignored: {e}");
                }
            }
            event = status_rx.recv() => {
                let event = event?;
                if args.json {
                    match serde_json::to_string(&event) {
                        Ok(line) => eprintln!("{line}"),
                        Err(e) => warn!("status event serialization failed: {e}"),
                    }
                }
                if event.status.is_terminal() {
                    info!(status = ?event.status, "emission finished");
                    break;
                }
            }
        }
    }

    Ok(())
}
