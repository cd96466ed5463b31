use std::time::Duration;

use pharos_core::{
    EmissionStatus, EmissionStatusEvent, EngineConfig, Level, PharosEngine, PharosError,
    RecordingSink, Timing,
};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;

fn engine_with_sink(unit: Duration) -> (PharosEngine<RecordingSink>, RecordingSink) {
    let sink = RecordingSink::new();
    let config = EngineConfig {
        timing: Timing::new(unit),
    };
    let engine = PharosEngine::new(config, sink.clone());
    (engine, sink)
}

async fn wait_for_terminal(
    rx: &mut broadcast::Receiver<EmissionStatusEvent>,
) -> EmissionStatusEvent {
    loop {
        match rx.recv().await {
            Ok(event) if event.status.is_terminal() => return event,
            Ok(_) => continue,
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => panic!("status channel closed unexpectedly"),
        }
    }
}

fn assert_alternating_pairs(levels: &[Level], signals: usize) {
    assert_eq!(levels.len(), signals * 2);
    for (index, level) in levels.iter().enumerate() {
        let expected = if index % 2 == 0 {
            Level::High
        } else {
            Level::Low
        };
        assert_eq!(*level, expected, "transition {index}");
    }
}

#[tokio::test(start_paused = true)]
async fn emission_reports_running_then_completed_in_deterministic_time() {
    let (engine, sink) = engine_with_sink(Duration::from_millis(100));
    let mut status_rx = engine.subscribe_status();

    let start = Instant::now();
    engine.emit("SOS").unwrap();

    let first = status_rx.recv().await.unwrap();
    assert_eq!(first.status, EmissionStatus::Running);

    let terminal = wait_for_terminal(&mut status_rx).await;
    assert_eq!(terminal.status, EmissionStatus::Completed);

    // SOS is 27 units: 9 signals (3+9+3 units high) plus gaps.
    assert_eq!(start.elapsed(), Duration::from_millis(2_700));
    assert_eq!(engine.status(), EmissionStatus::Completed);
    assert_alternating_pairs(&sink.levels(), 9);
}

#[tokio::test(start_paused = true)]
async fn second_emit_while_running_is_rejected_without_disturbing_the_sink() {
    let (engine, sink) = engine_with_sink(Duration::from_millis(100));
    let mut status_rx = engine.subscribe_status();

    engine.emit("SOS").unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = engine.emit("EEE").unwrap_err();
    assert!(matches!(err, PharosError::AlreadyRunning));

    let terminal = wait_for_terminal(&mut status_rx).await;
    assert_eq!(terminal.status, EmissionStatus::Completed);

    // Exactly one emission's trajectory, untouched by the rejected request.
    assert_alternating_pairs(&sink.levels(), 9);
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_signal_leaves_the_sink_low_and_frees_the_slot() {
    let (engine, sink) = engine_with_sink(Duration::from_millis(100));
    let mut status_rx = engine.subscribe_status();

    engine.emit("SOS").unwrap();

    // t = 250 ms: inside the second dit, sink high.
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(sink.last_level(), Some(Level::High));
    engine.cancel().unwrap();

    let terminal = wait_for_terminal(&mut status_rx).await;
    assert_eq!(terminal.status, EmissionStatus::Cancelled);
    assert_eq!(sink.last_level(), Some(Level::Low));
    assert_eq!(engine.status(), EmissionStatus::Cancelled);

    // The slot is free again.
    engine.emit("E").unwrap();
    let terminal = wait_for_terminal(&mut status_rx).await;
    assert_eq!(terminal.status, EmissionStatus::Completed);
}

#[test]
fn cancel_when_idle_returns_not_running() {
    let sink = RecordingSink::new();
    let engine = PharosEngine::new(EngineConfig::default(), sink);

    assert!(matches!(engine.cancel(), Err(PharosError::NotRunning)));
    assert_eq!(engine.status(), EmissionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn sink_failure_surfaces_as_error_status_with_detail() {
    let (engine, sink) = engine_with_sink(Duration::from_millis(100));
    let mut status_rx = engine.subscribe_status();
    sink.fail_after(3);

    engine.emit("SOS").unwrap();

    let terminal = wait_for_terminal(&mut status_rx).await;
    assert_eq!(terminal.status, EmissionStatus::Error);
    assert!(terminal
        .detail
        .expect("error status should carry detail")
        .contains("sink write error"));
    assert_eq!(engine.status(), EmissionStatus::Error);

    // The slot is freed even after a failed run.
    engine.emit("E").unwrap();
    let terminal = wait_for_terminal(&mut status_rx).await;
    assert_eq!(terminal.status, EmissionStatus::Error);
}

#[tokio::test(start_paused = true)]
async fn empty_message_completes_immediately_without_transitions() {
    let (engine, sink) = engine_with_sink(Duration::from_millis(100));
    let mut status_rx = engine.subscribe_status();

    let start = Instant::now();
    engine.emit("").unwrap();

    let terminal = wait_for_terminal(&mut status_rx).await;
    assert_eq!(terminal.status, EmissionStatus::Completed);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(sink.transitions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn activity_events_mirror_the_sink_transitions() {
    let (engine, _sink) = engine_with_sink(Duration::from_millis(100));
    let mut status_rx = engine.subscribe_status();
    let mut activity_rx = engine.subscribe_activity();

    engine.emit("E").unwrap();
    wait_for_terminal(&mut status_rx).await;

    let first = activity_rx.recv().await.unwrap();
    let second = activity_rx.recv().await.unwrap();

    assert_eq!(first.level, Level::High);
    assert_eq!(second.level, Level::Low);
    assert_eq!(second.seq, first.seq + 1);
}
