// conformance-core/src/runtime/frame.rs
// ============================================================================
// Module: Frame Loop
// Description: The wait/begin/render/end cycle driving display submission.
// Purpose: Iterate frames until the per-frame callback asks to stop.
// Dependencies: crate::runtime::session
// ============================================================================

//! ## Overview
//! Each iteration waits for the next frame's timing, begins the frame, and
//! hands control to the per-frame callback. The callback renders, submits the
//! frame through the orchestrator's end-frame call, and returns whether to
//! keep looping; returning an error aborts the loop and unwinds through the
//! orchestrator's scoped cleanup. The loop records the most recent predicted
//! display time so space/pose queries inside the same logical frame reuse a
//! consistent timestamp instead of re-querying.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::FrameState;
use crate::core::RuntimeTime;
use crate::error::HarnessResult;
use crate::interfaces::DeviceRuntime;
use crate::runtime::session::SessionOrchestrator;

// ============================================================================
// SECTION: Frame Loop
// ============================================================================

/// Drives the per-frame cycle over a session orchestrator.
#[derive(Debug, Default)]
pub struct FrameLoop {
    /// Predicted display time of the most recent frame, once one was waited.
    last_predicted_display_time: Option<RuntimeTime>,
}

impl FrameLoop {
    /// Creates a frame loop that has not yet iterated.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_predicted_display_time: None,
        }
    }

    /// Runs one iteration: wait-frame, begin-frame, then the callback.
    ///
    /// The callback is responsible for ending the frame through the
    /// orchestrator; it returns `Ok(false)` to stop the loop.
    ///
    /// # Errors
    ///
    /// Propagates runtime failures from the frame cycle or the callback.
    pub fn iterate<R, F>(
        &mut self,
        orchestrator: &mut SessionOrchestrator<R>,
        end_frame: &mut F,
    ) -> HarnessResult<bool>
    where
        R: DeviceRuntime,
        F: FnMut(&mut SessionOrchestrator<R>, &FrameState) -> HarnessResult<bool>,
    {
        let frame_state = orchestrator.wait_and_begin_frame()?;
        self.last_predicted_display_time = Some(frame_state.predicted_display_time);
        end_frame(orchestrator, &frame_state)
    }

    /// Iterates frames until the callback returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Propagates the first failure from any iteration.
    pub fn run<R, F>(
        &mut self,
        orchestrator: &mut SessionOrchestrator<R>,
        mut end_frame: F,
    ) -> HarnessResult
    where
        R: DeviceRuntime,
        F: FnMut(&mut SessionOrchestrator<R>, &FrameState) -> HarnessResult<bool>,
    {
        while self.iterate(orchestrator, &mut end_frame)? {}
        Ok(())
    }

    /// Returns the predicted display time recorded by the latest iteration.
    #[must_use]
    pub const fn last_predicted_display_time(&self) -> Option<RuntimeTime> {
        self.last_predicted_display_time
    }
}
