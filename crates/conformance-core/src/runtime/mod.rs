// conformance-core/src/runtime/mod.rs
// ============================================================================
// Module: Session Orchestration
// Description: Action binding, frame loop, session waits, interactive mode.
// Purpose: Drive a session through its lifecycle on one logical test thread.
// Dependencies: crate::{core, error, events, interfaces}
// ============================================================================

//! ## Overview
//! The orchestrator binds input actions, waits for session readiness, and
//! iterates the wait/begin/render/end frame cycle. Lifecycle transitions are
//! observed, never commanded: the orchestrator reads state-change events
//! through a private cursor and polls with bounded timeouts. Waits are plain
//! poll loops (poll, sleep a fixed interval, retry); no callbacks, no
//! coroutines.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod actions;
pub mod frame;
pub mod interactive;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use actions::ActionBinder;
pub use actions::ProfileBindings;
pub use frame::FrameLoop;
pub use interactive::InteractiveMode;
pub use interactive::InteractiveModeController;
pub use session::SessionOrchestrator;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::thread;
use std::time::Duration;
use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Timeouts
// ============================================================================

/// Bounded-wait policy shared by the orchestrator's poll loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Deadline for observing a target session state.
    pub state_transition: Duration,
    /// Deadline for the runtime to produce frame timing.
    pub frame_wait: Duration,
    /// Deadline for acquiring a swapchain image before a stall is an error.
    pub image_acquire: Duration,
    /// Fixed sleep between poll attempts.
    pub poll_delay: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            state_transition: Duration::from_secs(10),
            frame_wait: Duration::from_secs(1),
            image_acquire: Duration::from_millis(500),
            poll_delay: Duration::from_millis(5),
        }
    }
}

// ============================================================================
// SECTION: Bounded Waiting
// ============================================================================

/// Polls a predicate until it holds or the timeout elapses, sleeping `delay`
/// between attempts. Returns true when the predicate held.
pub fn wait_until(mut predicate: impl FnMut() -> bool, timeout: Duration, delay: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if predicate() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(delay);
    }
}
