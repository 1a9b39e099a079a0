// conformance-core/tests/frame_loop.rs
// ============================================================================
// Module: Frame Loop Tests
// Description: Tests for the wait/begin/callback frame cycle.
// ============================================================================
//! ## Overview
//! Validates that the loop runs exactly until the callback declines, that the
//! callback owns end-frame submission, and that the most recent predicted
//! display time is recorded for reuse.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap on deterministic fixtures."
)]

use conformance_core::FrameLoop;
use conformance_core::SessionOrchestrator;
use conformance_core::TestFailure;
use conformance_core::Timeouts;
use conformance_core::core::FormFactor;
use conformance_core::core::SessionState;
use conformance_core::core::ViewConfigurationKind;
use conformance_core::sim::ScriptedRuntime;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Creates an orchestrator already driven to the focused state.
fn focused_orchestrator() -> SessionOrchestrator<ScriptedRuntime> {
    let mut orch = SessionOrchestrator::new(
        ScriptedRuntime::new(),
        FormFactor::HeadMountedDisplay,
        ViewConfigurationKind::Stereo,
        Timeouts::default(),
    )
    .unwrap();
    orch.run_to_state(SessionState::Focused).unwrap();
    orch
}

// ============================================================================
// SECTION: Loop Control
// ============================================================================

#[test]
fn test_loop_runs_until_callback_declines() {
    let mut orch = focused_orchestrator();
    let frames_before = orch.runtime().submitted_frames().len();

    let mut frame_loop = FrameLoop::new();
    let mut iterations = 0_u32;
    frame_loop
        .run(&mut orch, |orch, frame_state| {
            iterations += 1;
            orch.end_frame(frame_state.predicted_display_time, &[])?;
            Ok(iterations < 3)
        })
        .unwrap();

    assert_eq!(iterations, 3);
    assert_eq!(
        orch.runtime().submitted_frames().len() - frames_before,
        3,
        "every iteration submitted its frame"
    );
}

#[test]
fn test_callback_error_aborts_the_loop() {
    let mut orch = focused_orchestrator();

    let mut frame_loop = FrameLoop::new();
    let mut iterations = 0_u32;
    let failure = frame_loop
        .run(&mut orch, |orch, frame_state| {
            iterations += 1;
            orch.end_frame(frame_state.predicted_display_time, &[])?;
            if iterations == 2 {
                return Err(TestFailure::assertion("scene mismatch"));
            }
            Ok(true)
        })
        .unwrap_err();

    assert_eq!(iterations, 2, "the loop stopped at the failing frame");
    assert!(matches!(failure, TestFailure::Assertion { .. }));
}

// ============================================================================
// SECTION: Display Time Recording
// ============================================================================

#[test]
fn test_last_predicted_display_time_tracks_the_latest_frame() {
    let mut orch = focused_orchestrator();

    let mut frame_loop = FrameLoop::new();
    assert_eq!(frame_loop.last_predicted_display_time(), None);

    let mut latest = None;
    frame_loop
        .run(&mut orch, |orch, frame_state| {
            latest = Some(frame_state.predicted_display_time);
            orch.end_frame(frame_state.predicted_display_time, &[])?;
            Ok(latest.map_or(0, conformance_core::core::RuntimeTime::as_nanos)
                < 100_000_000)
        })
        .unwrap();

    assert_eq!(frame_loop.last_predicted_display_time(), latest);
    assert!(latest.is_some());
}

#[test]
fn test_display_times_advance_monotonically() {
    let mut orch = focused_orchestrator();

    let mut frame_loop = FrameLoop::new();
    let mut times = Vec::new();
    frame_loop
        .run(&mut orch, |orch, frame_state| {
            times.push(frame_state.predicted_display_time);
            orch.end_frame(frame_state.predicted_display_time, &[])?;
            Ok(times.len() < 4)
        })
        .unwrap();

    for pair in times.windows(2) {
        assert!(pair[0] < pair[1], "display times must advance");
    }
}
