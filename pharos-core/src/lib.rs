//! # pharos-core
//!
//! Reusable Morse signalling engine SDK.
//!
//! ## Architecture
//!
//! ```text
//! text → encoder::encode → Vec<Token> → PharosEngine::emit
//!                                            │
//!                                    emitter task (tokio)
//!                                            │
//!                                  OutputSink::set(High/Low)
//!                                            │
//!                           broadcast::Sender<SinkActivityEvent>
//! ```
//!
//! The encoder is pure; all timing happens in the emitter task, which is
//! cancellable at every timed wait and always leaves the sink low.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod delay;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod events;
pub mod sink;
pub mod timing;

// Convenience re-exports for downstream crates
pub use delay::{DelaySource, TokioDelay};
pub use encoder::{encode, Token};
pub use engine::{EngineConfig, PharosEngine};
pub use error::PharosError;
pub use events::{EmissionStatus, EmissionStatusEvent, SinkActivityEvent};
pub use sink::{Level, OutputSink, RecordingSink};
pub use timing::Timing;
