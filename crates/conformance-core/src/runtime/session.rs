// conformance-core/src/runtime/session.rs
// ============================================================================
// Module: Session Orchestrator
// Description: Session lifecycle driving, resource ownership, and waits.
// Purpose: Own the session and its resources; observe state through events.
// Dependencies: crate::{core, error, events, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The orchestrator creates the session, owns every space, swapchain, and
//! action set created through it, and destroys them deterministically in
//! reverse creation order at teardown, even when a test exits via a failure
//! path. Session state is driven entirely by state-change events read from a
//! private cursor created at session creation; the orchestrator never infers
//! state any other way.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::core::ActionHandle;
use crate::core::ActionKind;
use crate::core::ActionSetHandle;
use crate::core::BooleanActionState;
use crate::core::CompositionLayer;
use crate::core::EventData;
use crate::core::FormFactor;
use crate::core::FrameState;
use crate::core::ImageFormat;
use crate::core::Posef;
use crate::core::ReferenceSpaceType;
use crate::core::RuntimeTime;
use crate::core::SessionHandle;
use crate::core::SessionState;
use crate::core::SpaceHandle;
use crate::core::SwapchainCreateInfo;
use crate::core::SwapchainHandle;
use crate::core::ViewConfigurationKind;
use crate::error::HarnessResult;
use crate::error::TestFailure;
use crate::events::EventCursor;
use crate::events::EventLog;
use crate::interfaces::DeviceRuntime;
use crate::interfaces::RenderBackend;
use crate::interfaces::RenderError;
use crate::runtime::Timeouts;
use crate::runtime::actions::ActionBinder;
use crate::runtime::wait_until;

// ============================================================================
// SECTION: Owned Resources
// ============================================================================

/// One resource created through the orchestrator, tracked for teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OwnedResource {
    /// A reference or action space.
    Space(SpaceHandle),
    /// A swapchain of target images.
    Swapchain(SwapchainHandle),
    /// An action set.
    ActionSet(ActionSetHandle),
}

/// Color formats preferred for default swapchains, most preferred first.
const PREFERRED_COLOR_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Rgba8Srgb,
    ImageFormat::Bgra8Srgb,
    ImageFormat::Rgba8,
    ImageFormat::Bgra8,
];

// ============================================================================
// SECTION: Session Orchestrator
// ============================================================================

/// Owns one session and drives it through its lifecycle.
pub struct SessionOrchestrator<R: DeviceRuntime> {
    /// The device runtime under test.
    runtime: R,
    /// The session this orchestrator owns.
    session: SessionHandle,
    /// The instance's event log; shared with any additional cursors.
    event_log: Arc<EventLog>,
    /// Private cursor observing session state changes.
    state_cursor: EventCursor,
    /// Most recently observed session state.
    session_state: SessionState,
    /// True between begin-session and end-session.
    session_running: bool,
    /// True once an instance-loss or stop event was observed.
    stop_observed: bool,
    /// Accumulated action sets and bindings.
    binder: ActionBinder,
    /// Bounded-wait policy.
    timeouts: Timeouts,
    /// Resources in creation order; destroyed in reverse.
    owned: Vec<OwnedResource>,
    /// Set once shutdown ran.
    torn_down: bool,
}

impl<R: DeviceRuntime> SessionOrchestrator<R> {
    /// Creates the event log, the session, and the private state cursor.
    ///
    /// The cursor is created at session-creation time so every state change
    /// the session ever reports is observable through it.
    ///
    /// # Errors
    ///
    /// Propagates session-creation failures.
    pub fn new(
        mut runtime: R,
        form_factor: FormFactor,
        view_configuration: ViewConfigurationKind,
        timeouts: Timeouts,
    ) -> HarnessResult<Self> {
        let source = runtime.create_event_source();
        let event_log = Arc::new(EventLog::new(source));
        let state_cursor = EventCursor::new(&event_log);
        let session = runtime.create_session(form_factor, view_configuration)?;
        Ok(Self {
            runtime,
            session,
            event_log,
            state_cursor,
            session_state: SessionState::Idle,
            session_running: false,
            stop_observed: false,
            binder: ActionBinder::new(),
            timeouts,
            owned: Vec::new(),
            torn_down: false,
        })
    }

    // ========================================================================
    // SECTION: Accessors
    // ========================================================================

    /// Returns the session handle.
    #[must_use]
    pub const fn session(&self) -> SessionHandle {
        self.session
    }

    /// Returns the runtime.
    pub const fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Returns the runtime mutably.
    pub const fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    /// Returns the action binder.
    #[must_use]
    pub const fn binder(&self) -> &ActionBinder {
        &self.binder
    }

    /// Returns the action binder mutably.
    pub const fn binder_mut(&mut self) -> &mut ActionBinder {
        &mut self.binder
    }

    /// Returns the most recently observed session state.
    #[must_use]
    pub const fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Returns the bounded-wait policy.
    #[must_use]
    pub const fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Creates an independent cursor over the instance's event log.
    #[must_use]
    pub fn create_cursor(&self) -> EventCursor {
        EventCursor::new(&self.event_log)
    }

    // ========================================================================
    // SECTION: Event Pumping
    // ========================================================================

    /// Reads every pending event through the private cursor, updating the
    /// observed session state. Returns false once the session is stopping or
    /// the instance is about to be lost.
    pub fn pump_events(&mut self) -> bool {
        while let Some(record) = self.state_cursor.try_read_next() {
            match record.data {
                EventData::SessionStateChanged {
                    session,
                    state,
                } if session == self.session => {
                    self.session_state = state;
                    if state == SessionState::StoppingOrLost {
                        self.stop_observed = true;
                    }
                }
                EventData::InstanceLossPending {
                    ..
                } => {
                    self.stop_observed = true;
                }
                _ => {}
            }
        }
        !self.stop_observed
    }

    /// Blocks polling the private cursor until the target state is observed.
    ///
    /// # Errors
    ///
    /// Returns [`TestFailure::Timeout`] when the bounded deadline elapses
    /// before the state is observed.
    pub fn wait_for_state(&mut self, target: SessionState) -> HarnessResult {
        let timeout = self.timeouts.state_transition;
        let delay = self.timeouts.poll_delay;
        let reached = wait_until(
            || {
                self.pump_events();
                self.session_state == target
            },
            timeout,
            delay,
        );
        if reached {
            Ok(())
        } else {
            Err(TestFailure::timeout(format!("session state {target}"), timeout))
        }
    }

    /// Drives the session toward the target state, beginning the session and
    /// submitting empty frames as required, until the state is observed or
    /// the bounded deadline elapses.
    ///
    /// # Errors
    ///
    /// Returns [`TestFailure::Timeout`] on deadline expiry and propagates
    /// runtime failures from the frame cycle.
    pub fn run_to_state(&mut self, target: SessionState) -> HarnessResult {
        let timeout = self.timeouts.state_transition;
        let deadline = Instant::now() + timeout;
        loop {
            self.pump_events();
            if self.session_state == target {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(TestFailure::timeout(format!("session state {target}"), timeout));
            }
            match self.session_state {
                SessionState::Ready if !self.session_running => self.begin_session()?,
                SessionState::Ready
                | SessionState::Synchronized
                | SessionState::Visible
                | SessionState::Focused => self.submit_empty_frame()?,
                SessionState::Idle | SessionState::StoppingOrLost => {
                    thread::sleep(self.timeouts.poll_delay);
                }
            }
        }
    }

    // ========================================================================
    // SECTION: Session Lifecycle
    // ========================================================================

    /// Begins the session.
    ///
    /// # Errors
    ///
    /// Propagates the runtime's rejection.
    pub fn begin_session(&mut self) -> HarnessResult {
        self.runtime.begin_session(self.session)?;
        self.session_running = true;
        Ok(())
    }

    /// Asks the runtime to wind the session down.
    ///
    /// # Errors
    ///
    /// Propagates the runtime's rejection.
    pub fn request_exit(&mut self) -> HarnessResult {
        self.runtime.request_exit(self.session)?;
        Ok(())
    }

    // ========================================================================
    // SECTION: Frame Cycle
    // ========================================================================

    /// Waits for the next frame's timing and begins the frame.
    ///
    /// # Errors
    ///
    /// Propagates runtime failures from either call.
    pub fn wait_and_begin_frame(&mut self) -> HarnessResult<FrameState> {
        let frame_state = self.runtime.wait_frame(self.session)?;
        self.runtime.begin_frame(self.session)?;
        Ok(frame_state)
    }

    /// Submits composition layers for the frame being prepared.
    ///
    /// # Errors
    ///
    /// Propagates runtime failures.
    pub fn end_frame(
        &mut self,
        display_time: RuntimeTime,
        layers: &[CompositionLayer],
    ) -> HarnessResult {
        self.runtime.end_frame(self.session, display_time, layers)?;
        Ok(())
    }

    /// Runs one full frame cycle submitting no layers.
    fn submit_empty_frame(&mut self) -> HarnessResult {
        let frame_state = self.wait_and_begin_frame()?;
        self.end_frame(frame_state.predicted_display_time, &[])
    }

    // ========================================================================
    // SECTION: Resource Creation
    // ========================================================================

    /// Creates a reference space owned by this orchestrator.
    ///
    /// # Errors
    ///
    /// Propagates runtime failures.
    pub fn create_reference_space(
        &mut self,
        space_type: ReferenceSpaceType,
        pose: Posef,
    ) -> HarnessResult<SpaceHandle> {
        let space = self.runtime.create_reference_space(self.session, space_type, pose)?;
        self.owned.push(OwnedResource::Space(space));
        Ok(space)
    }

    /// Creates a swapchain owned by this orchestrator.
    ///
    /// # Errors
    ///
    /// Propagates runtime failures.
    pub fn create_swapchain(
        &mut self,
        info: &SwapchainCreateInfo,
    ) -> HarnessResult<SwapchainHandle> {
        let swapchain = self.runtime.create_swapchain(self.session, info)?;
        self.owned.push(OwnedResource::Swapchain(swapchain));
        Ok(swapchain)
    }

    /// Creates an action set owned by this orchestrator and registers it with
    /// the binder.
    ///
    /// # Errors
    ///
    /// Propagates runtime failures; fails internally once bindings froze.
    pub fn create_action_set(&mut self, name: &str) -> HarnessResult<ActionSetHandle> {
        let set = self.runtime.create_action_set(name)?;
        self.owned.push(OwnedResource::ActionSet(set));
        self.binder.add_action_set(set)?;
        Ok(set)
    }

    /// Creates an action in a set; the action's lifetime follows its set.
    ///
    /// # Errors
    ///
    /// Propagates runtime failures.
    pub fn create_action(
        &mut self,
        set: ActionSetHandle,
        name: &str,
        kind: ActionKind,
    ) -> HarnessResult<ActionHandle> {
        let action = self.runtime.create_action(set, name, kind)?;
        Ok(action)
    }

    /// Locates one space in another at the given time.
    ///
    /// # Errors
    ///
    /// Propagates runtime failures; an unresolvable pose is `Ok(None)`.
    pub fn locate(
        &mut self,
        space: SpaceHandle,
        base: SpaceHandle,
        time: RuntimeTime,
    ) -> HarnessResult<Option<Posef>> {
        let pose = self.runtime.locate_space(space, base, time)?;
        Ok(pose)
    }

    // ========================================================================
    // SECTION: Action Plumbing
    // ========================================================================

    /// Attaches the accumulated bindings to this session, freezing them.
    ///
    /// # Errors
    ///
    /// Propagates the runtime's rejection rather than silently dropping
    /// bindings; re-attachment is an internal harness error.
    pub fn attach_bindings(&mut self) -> HarnessResult {
        self.binder.attach(&mut self.runtime, self.session)
    }

    /// Synchronizes action state for the attached sets.
    ///
    /// # Errors
    ///
    /// Propagates runtime failures; fails internally before attachment.
    pub fn sync_actions(&mut self) -> HarnessResult {
        self.binder.sync(&mut self.runtime, self.session)
    }

    /// Samples a boolean action's state as of the last sync.
    ///
    /// # Errors
    ///
    /// Propagates runtime failures.
    pub fn action_state_boolean(
        &mut self,
        action: ActionHandle,
    ) -> HarnessResult<BooleanActionState> {
        let state = self.runtime.action_state_boolean(self.session, action)?;
        Ok(state)
    }

    // ========================================================================
    // SECTION: Rendering Helpers
    // ========================================================================

    /// Picks the default color format: the most preferred format the backend
    /// supports, or its first reported format.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NoColorFormat`] when the backend reports no
    /// formats at all.
    pub fn default_color_format<G: RenderBackend>(
        &self,
        backend: &G,
    ) -> HarnessResult<ImageFormat> {
        let supported = backend.supported_formats();
        for preferred in PREFERRED_COLOR_FORMATS {
            if supported.contains(&preferred) {
                return Ok(preferred);
            }
        }
        supported.first().copied().ok_or(TestFailure::Render(RenderError::NoColorFormat))
    }

    /// Acquires an image, runs the draw closure, and releases the image even
    /// when drawing fails, so a timeout or draw error never leaks an
    /// acquisition.
    ///
    /// # Errors
    ///
    /// Propagates acquire timeouts, draw failures, then release failures, in
    /// that order.
    pub fn acquire_draw_release<G, F>(
        &mut self,
        backend: &mut G,
        swapchain: SwapchainHandle,
        draw: F,
    ) -> HarnessResult
    where
        G: RenderBackend,
        F: FnOnce(&mut G, u32) -> HarnessResult,
    {
        let image_index = backend.acquire_image(swapchain, self.timeouts.image_acquire)?;
        let drawn = draw(backend, image_index);
        let released = backend.release_image(swapchain, image_index);
        drawn?;
        released?;
        Ok(())
    }

    // ========================================================================
    // SECTION: Teardown
    // ========================================================================

    /// Destroys every owned resource in reverse creation order, then ends and
    /// destroys the session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns the first destruction failure after attempting every
    /// destruction; later failures do not stop earlier cleanup.
    pub fn shutdown(&mut self) -> HarnessResult {
        if self.torn_down {
            return Ok(());
        }
        self.torn_down = true;

        let mut first_error: Option<TestFailure> = None;
        while let Some(resource) = self.owned.pop() {
            let outcome = match resource {
                OwnedResource::Space(space) => self.runtime.destroy_space(space),
                OwnedResource::Swapchain(swapchain) => self.runtime.destroy_swapchain(swapchain),
                OwnedResource::ActionSet(set) => self.runtime.destroy_action_set(set),
            };
            if let Err(error) = outcome
                && first_error.is_none()
            {
                first_error = Some(TestFailure::Protocol(error));
            }
        }

        if self.session_running {
            if let Err(error) = self.runtime.end_session(self.session)
                && first_error.is_none()
            {
                first_error = Some(TestFailure::Protocol(error));
            }
            self.session_running = false;
        }
        if let Err(error) = self.runtime.destroy_session(self.session)
            && first_error.is_none()
        {
            first_error = Some(TestFailure::Protocol(error));
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl<R: DeviceRuntime> Drop for SessionOrchestrator<R> {
    fn drop(&mut self) {
        // Failure-path teardown: destruction order still holds, errors are
        // unreportable here.
        let _ = self.shutdown();
    }
}
