// conformance-core/src/sim/mod.rs
// ============================================================================
// Module: Scripted Runtime
// Description: Deterministic in-process device runtime and render backend.
// Purpose: Provide the scripted decision point for tests and smoke runs.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The scripted runtime implements the device-runtime contract entirely in
//! process: session states advance on a fixed schedule, action state is
//! replayed from scripted queues, and every create/destroy call lands in a
//! journal so tests can assert teardown order. The scripted render backend
//! records its operations and enforces the one-acquired-image-at-a-time rule.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use crate::core::ActionBinding;
use crate::core::ActionHandle;
use crate::core::ActionKind;
use crate::core::ActionSetHandle;
use crate::core::ApiVersion;
use crate::core::BooleanActionState;
use crate::core::Color4f;
use crate::core::CompositionLayer;
use crate::core::EventData;
use crate::core::EventRecord;
use crate::core::FormFactor;
use crate::core::FrameState;
use crate::core::ImageFormat;
use crate::core::Posef;
use crate::core::ProfilePath;
use crate::core::ReferenceSpaceType;
use crate::core::RuntimeStatus;
use crate::core::RuntimeTime;
use crate::core::SessionHandle;
use crate::core::SessionState;
use crate::core::SpaceHandle;
use crate::core::SwapchainCreateInfo;
use crate::core::SwapchainHandle;
use crate::core::ViewConfigurationKind;
use crate::interfaces::DeviceRuntime;
use crate::interfaces::EventSource;
use crate::interfaces::RenderBackend;
use crate::interfaces::RenderError;
use crate::interfaces::RuntimeError;

// ============================================================================
// SECTION: Action State Helpers
// ============================================================================

/// A freshly pressed boolean action state.
#[must_use]
pub const fn pressed() -> BooleanActionState {
    BooleanActionState {
        current: true,
        changed_since_last_sync: true,
        is_active: true,
    }
}

/// A held boolean action state (pressed, unchanged).
#[must_use]
pub const fn held() -> BooleanActionState {
    BooleanActionState {
        current: true,
        changed_since_last_sync: false,
        is_active: true,
    }
}

/// A released boolean action state.
#[must_use]
pub const fn released() -> BooleanActionState {
    BooleanActionState {
        current: false,
        changed_since_last_sync: false,
        is_active: true,
    }
}

// ============================================================================
// SECTION: Scripted Event Source
// ============================================================================

/// Poll source sharing the scripted runtime's pending event queue.
struct ScriptedEventSource {
    /// Events the runtime has emitted but nothing has polled yet.
    pending: Arc<Mutex<VecDeque<EventRecord>>>,
}

/// Locks a shared queue, recovering from poisoning.
fn lock_pending(
    pending: &Arc<Mutex<VecDeque<EventRecord>>>,
) -> MutexGuard<'_, VecDeque<EventRecord>> {
    match pending.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl EventSource for ScriptedEventSource {
    fn poll_event(&mut self) -> Option<EventRecord> {
        lock_pending(&self.pending).pop_front()
    }
}

// ============================================================================
// SECTION: Scripted Runtime
// ============================================================================

/// Default frame period of the scripted display.
const DEFAULT_FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Deterministic device runtime for tests and headless smoke runs.
pub struct ScriptedRuntime {
    /// Scripted monotonic clock, in nanoseconds.
    now_nanos: i64,
    /// Interval the scripted display refreshes at.
    frame_period: Duration,
    /// Next raw handle value to hand out.
    next_handle: u64,
    /// Negotiated specification version.
    api_version: ApiVersion,
    /// Extension names the runtime claims to support.
    available_extensions: Vec<String>,
    /// Extension names enabled on the instance.
    enabled_extensions: Vec<String>,
    /// The one session this runtime serves, once created.
    session: Option<SessionHandle>,
    /// The runtime's own lifecycle state (what it has announced).
    lifecycle: SessionState,
    /// True between begin-session and end-session.
    session_running: bool,
    /// True between wait-frame and begin-frame.
    frame_waited: bool,
    /// True between begin-frame and end-frame.
    frame_begun: bool,
    /// Whether begin-session auto-advances to the focused state.
    auto_focus: bool,
    /// Whether world-locked poses can currently be resolved.
    world_lock_available: bool,
    /// Pose reported for successful space locations.
    located_pose: Posef,
    /// Events emitted but not yet polled, shared with the event source.
    pending: Arc<Mutex<VecDeque<EventRecord>>>,
    /// Create/destroy journal, in call order.
    journal: Vec<String>,
    /// Binding suggestions in submission order.
    suggestions: Vec<(ProfilePath, Vec<ActionBinding>)>,
    /// Set once action sets were attached.
    attached: bool,
    /// When set, the next attach call is rejected with this reason.
    attach_rejection: Option<String>,
    /// Scripted boolean action states, popped one per sync.
    scripted_actions: HashMap<u64, VecDeque<BooleanActionState>>,
    /// Action state as of the last sync.
    synced_actions: HashMap<u64, BooleanActionState>,
    /// Number of action syncs performed.
    sync_count: u64,
    /// Layers submitted at each end-frame, in frame order.
    submitted_frames: Vec<Vec<CompositionLayer>>,
}

impl Default for ScriptedRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRuntime {
    /// Creates a runtime with version 1.1 and no extensions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now_nanos: 0,
            frame_period: DEFAULT_FRAME_PERIOD,
            next_handle: 1,
            api_version: ApiVersion::V1_1,
            available_extensions: Vec::new(),
            enabled_extensions: Vec::new(),
            session: None,
            lifecycle: SessionState::Idle,
            session_running: false,
            frame_waited: false,
            frame_begun: false,
            auto_focus: true,
            world_lock_available: true,
            located_pose: Posef::IDENTITY,
            pending: Arc::new(Mutex::new(VecDeque::new())),
            journal: Vec::new(),
            suggestions: Vec::new(),
            attached: false,
            attach_rejection: None,
            scripted_actions: HashMap::new(),
            synced_actions: HashMap::new(),
            sync_count: 0,
            submitted_frames: Vec::new(),
        }
    }

    /// Creates a runtime reporting the given extension lists.
    #[must_use]
    pub fn with_extensions(available: Vec<String>, enabled: Vec<String>) -> Self {
        let mut runtime = Self::new();
        runtime.available_extensions = available;
        runtime.enabled_extensions = enabled;
        runtime
    }

    // ========================================================================
    // SECTION: Scripting Controls
    // ========================================================================

    /// Queues boolean states for an action; each sync pops one.
    pub fn script_action(
        &mut self,
        action: ActionHandle,
        states: impl IntoIterator<Item = BooleanActionState>,
    ) {
        self.scripted_actions.entry(action.raw()).or_default().extend(states);
    }

    /// Controls whether begin-session auto-advances to focused.
    pub const fn set_auto_focus(&mut self, auto_focus: bool) {
        self.auto_focus = auto_focus;
    }

    /// Controls whether world-locked poses resolve.
    pub const fn set_world_lock_available(&mut self, available: bool) {
        self.world_lock_available = available;
    }

    /// Makes the next attach call fail with the given reason.
    pub fn reject_next_attach(&mut self, reason: impl Into<String>) {
        self.attach_rejection = Some(reason.into());
    }

    /// Emits an event into the pending queue at the current scripted time.
    pub fn post_event(&mut self, data: EventData) {
        let record = EventRecord::new(RuntimeTime::from_nanos(self.now_nanos), data);
        lock_pending(&self.pending).push_back(record);
    }

    // ========================================================================
    // SECTION: Inspection
    // ========================================================================

    /// Returns the create/destroy journal in call order.
    #[must_use]
    pub fn journal(&self) -> &[String] {
        &self.journal
    }

    /// Returns binding suggestions in submission order.
    #[must_use]
    pub fn suggestions(&self) -> &[(ProfilePath, Vec<ActionBinding>)] {
        &self.suggestions
    }

    /// Returns the layers submitted at each end-frame.
    #[must_use]
    pub fn submitted_frames(&self) -> &[Vec<CompositionLayer>] {
        &self.submitted_frames
    }

    /// Returns how many action syncs were performed.
    #[must_use]
    pub const fn sync_count(&self) -> u64 {
        self.sync_count
    }

    /// Returns the current scripted time.
    #[must_use]
    pub const fn now(&self) -> RuntimeTime {
        RuntimeTime::from_nanos(self.now_nanos)
    }

    // ========================================================================
    // SECTION: Internals
    // ========================================================================

    /// Allocates the next raw handle.
    fn allocate_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    /// Announces a session state, recording it and queueing the event.
    fn announce_state(&mut self, state: SessionState) {
        self.lifecycle = state;
        if let Some(session) = self.session {
            self.post_event(EventData::SessionStateChanged {
                session,
                state,
            });
        }
    }

    /// Validates that a call refers to the live session.
    fn check_session(
        &self,
        call: &'static str,
        session: SessionHandle,
    ) -> Result<(), RuntimeError> {
        if self.session == Some(session) {
            Ok(())
        } else {
            Err(RuntimeError::UnexpectedStatus {
                call,
                status: RuntimeStatus::HandleInvalid,
            })
        }
    }
}

impl DeviceRuntime for ScriptedRuntime {
    fn runtime_name(&self) -> String {
        "Scripted Conformance Runtime".to_owned()
    }

    fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    fn available_extensions(&self) -> Vec<String> {
        self.available_extensions.clone()
    }

    fn enabled_extensions(&self) -> Vec<String> {
        self.enabled_extensions.clone()
    }

    fn create_event_source(&mut self) -> Box<dyn EventSource + Send> {
        Box::new(ScriptedEventSource {
            pending: Arc::clone(&self.pending),
        })
    }

    fn create_session(
        &mut self,
        _form_factor: FormFactor,
        _view_configuration: ViewConfigurationKind,
    ) -> Result<SessionHandle, RuntimeError> {
        if self.session.is_some() {
            return Err(RuntimeError::UnexpectedStatus {
                call: "create_session",
                status: RuntimeStatus::LimitReached,
            });
        }
        let session = SessionHandle::from_raw(self.allocate_handle());
        self.session = Some(session);
        self.journal.push(format!("create session {session}"));
        self.announce_state(SessionState::Idle);
        self.announce_state(SessionState::Ready);
        Ok(session)
    }

    fn begin_session(&mut self, session: SessionHandle) -> Result<(), RuntimeError> {
        self.check_session("begin_session", session)?;
        if self.session_running || self.lifecycle != SessionState::Ready {
            return Err(RuntimeError::UnexpectedStatus {
                call: "begin_session",
                status: RuntimeStatus::CallOrderInvalid,
            });
        }
        self.session_running = true;
        self.announce_state(SessionState::Synchronized);
        if self.auto_focus {
            self.announce_state(SessionState::Visible);
            self.announce_state(SessionState::Focused);
        }
        Ok(())
    }

    fn request_exit(&mut self, session: SessionHandle) -> Result<(), RuntimeError> {
        self.check_session("request_exit", session)?;
        if !self.session_running {
            return Err(RuntimeError::UnexpectedStatus {
                call: "request_exit",
                status: RuntimeStatus::SessionNotRunning,
            });
        }
        self.announce_state(SessionState::StoppingOrLost);
        Ok(())
    }

    fn end_session(&mut self, session: SessionHandle) -> Result<(), RuntimeError> {
        self.check_session("end_session", session)?;
        if !self.session_running {
            return Err(RuntimeError::UnexpectedStatus {
                call: "end_session",
                status: RuntimeStatus::SessionNotRunning,
            });
        }
        self.session_running = false;
        self.announce_state(SessionState::Idle);
        Ok(())
    }

    fn destroy_session(&mut self, session: SessionHandle) -> Result<(), RuntimeError> {
        self.check_session("destroy_session", session)?;
        self.session = None;
        self.journal.push(format!("destroy session {session}"));
        Ok(())
    }

    fn wait_frame(&mut self, session: SessionHandle) -> Result<FrameState, RuntimeError> {
        self.check_session("wait_frame", session)?;
        if !self.session_running {
            return Err(RuntimeError::UnexpectedStatus {
                call: "wait_frame",
                status: RuntimeStatus::SessionNotRunning,
            });
        }
        let period_nanos = i64::try_from(self.frame_period.as_nanos()).unwrap_or(i64::MAX);
        self.now_nanos = self.now_nanos.saturating_add(period_nanos);
        self.frame_waited = true;
        Ok(FrameState {
            predicted_display_time: RuntimeTime::from_nanos(
                self.now_nanos.saturating_add(period_nanos),
            ),
            predicted_display_period: self.frame_period,
            should_render: matches!(
                self.lifecycle,
                SessionState::Visible | SessionState::Focused
            ),
        })
    }

    fn begin_frame(&mut self, session: SessionHandle) -> Result<(), RuntimeError> {
        self.check_session("begin_frame", session)?;
        if !self.frame_waited {
            return Err(RuntimeError::UnexpectedStatus {
                call: "begin_frame",
                status: RuntimeStatus::CallOrderInvalid,
            });
        }
        self.frame_waited = false;
        self.frame_begun = true;
        Ok(())
    }

    fn end_frame(
        &mut self,
        session: SessionHandle,
        _display_time: RuntimeTime,
        layers: &[CompositionLayer],
    ) -> Result<(), RuntimeError> {
        self.check_session("end_frame", session)?;
        if !self.frame_begun {
            return Err(RuntimeError::UnexpectedStatus {
                call: "end_frame",
                status: RuntimeStatus::CallOrderInvalid,
            });
        }
        self.frame_begun = false;
        self.submitted_frames.push(layers.to_vec());
        Ok(())
    }

    fn create_action_set(&mut self, name: &str) -> Result<ActionSetHandle, RuntimeError> {
        let set = ActionSetHandle::from_raw(self.allocate_handle());
        self.journal.push(format!("create action_set {set} ({name})"));
        Ok(set)
    }

    fn create_action(
        &mut self,
        set: ActionSetHandle,
        name: &str,
        _kind: ActionKind,
    ) -> Result<ActionHandle, RuntimeError> {
        let action = ActionHandle::from_raw(self.allocate_handle());
        self.journal.push(format!("create action {action} in {set} ({name})"));
        Ok(action)
    }

    fn suggest_bindings(
        &mut self,
        profile: &ProfilePath,
        bindings: &[ActionBinding],
    ) -> Result<(), RuntimeError> {
        if self.attached {
            return Err(RuntimeError::UnexpectedStatus {
                call: "suggest_bindings",
                status: RuntimeStatus::ActionSetsAlreadyAttached,
            });
        }
        self.suggestions.push((profile.clone(), bindings.to_vec()));
        Ok(())
    }

    fn attach_action_sets(
        &mut self,
        session: SessionHandle,
        _sets: &[ActionSetHandle],
    ) -> Result<(), RuntimeError> {
        self.check_session("attach_action_sets", session)?;
        if self.attached {
            return Err(RuntimeError::UnexpectedStatus {
                call: "attach_action_sets",
                status: RuntimeStatus::ActionSetsAlreadyAttached,
            });
        }
        if let Some(reason) = self.attach_rejection.take() {
            return Err(RuntimeError::Rejected {
                call: "attach_action_sets",
                reason,
            });
        }
        self.attached = true;
        Ok(())
    }

    fn sync_actions(
        &mut self,
        session: SessionHandle,
        _sets: &[ActionSetHandle],
    ) -> Result<(), RuntimeError> {
        self.check_session("sync_actions", session)?;
        if !self.attached {
            return Err(RuntimeError::UnexpectedStatus {
                call: "sync_actions",
                status: RuntimeStatus::CallOrderInvalid,
            });
        }
        self.sync_count += 1;
        for (action, queue) in &mut self.scripted_actions {
            if let Some(state) = queue.pop_front() {
                self.synced_actions.insert(*action, state);
            } else if let Some(last) = self.synced_actions.get_mut(action) {
                // Held inputs stay current but stop reporting a change.
                last.changed_since_last_sync = false;
            }
        }
        Ok(())
    }

    fn action_state_boolean(
        &mut self,
        session: SessionHandle,
        action: ActionHandle,
    ) -> Result<BooleanActionState, RuntimeError> {
        self.check_session("action_state_boolean", session)?;
        Ok(self.synced_actions.get(&action.raw()).copied().unwrap_or_default())
    }

    fn create_reference_space(
        &mut self,
        session: SessionHandle,
        space_type: ReferenceSpaceType,
        _pose: Posef,
    ) -> Result<SpaceHandle, RuntimeError> {
        self.check_session("create_reference_space", session)?;
        let space = SpaceHandle::from_raw(self.allocate_handle());
        self.journal.push(format!("create space {space} ({})", space_type.as_str()));
        Ok(space)
    }

    fn destroy_space(&mut self, space: SpaceHandle) -> Result<(), RuntimeError> {
        self.journal.push(format!("destroy space {space}"));
        Ok(())
    }

    fn locate_space(
        &mut self,
        _space: SpaceHandle,
        _base: SpaceHandle,
        _time: RuntimeTime,
    ) -> Result<Option<Posef>, RuntimeError> {
        if self.world_lock_available { Ok(Some(self.located_pose)) } else { Ok(None) }
    }

    fn create_swapchain(
        &mut self,
        session: SessionHandle,
        info: &SwapchainCreateInfo,
    ) -> Result<SwapchainHandle, RuntimeError> {
        self.check_session("create_swapchain", session)?;
        let swapchain = SwapchainHandle::from_raw(self.allocate_handle());
        self.journal.push(format!(
            "create swapchain {swapchain} ({} {}x{})",
            info.format, info.extent.width, info.extent.height
        ));
        Ok(swapchain)
    }

    fn destroy_swapchain(&mut self, swapchain: SwapchainHandle) -> Result<(), RuntimeError> {
        self.journal.push(format!("destroy swapchain {swapchain}"));
        Ok(())
    }

    fn destroy_action_set(&mut self, set: ActionSetHandle) -> Result<(), RuntimeError> {
        self.journal.push(format!("destroy action_set {set}"));
        Ok(())
    }
}

// ============================================================================
// SECTION: Scripted Render Backend
// ============================================================================

/// Render backend double recording operations and enforcing single
/// acquisition.
pub struct ScriptedRenderBackend {
    /// Formats the backend claims to support.
    formats: Vec<ImageFormat>,
    /// The currently acquired image, if any.
    acquired: Option<(SwapchainHandle, u32)>,
    /// Recorded operations in call order.
    operations: Vec<String>,
    /// When true, every acquire stalls past its timeout.
    stall_acquires: bool,
}

impl Default for ScriptedRenderBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRenderBackend {
    /// Creates a backend supporting the common color formats.
    #[must_use]
    pub fn new() -> Self {
        Self {
            formats: vec![ImageFormat::Rgba8Srgb, ImageFormat::Rgba8],
            acquired: None,
            operations: Vec::new(),
            stall_acquires: false,
        }
    }

    /// Creates a backend supporting exactly the given formats.
    #[must_use]
    pub fn with_formats(formats: Vec<ImageFormat>) -> Self {
        let mut backend = Self::new();
        backend.formats = formats;
        backend
    }

    /// Makes every subsequent acquire stall past its timeout.
    pub const fn stall_acquires(&mut self, stall: bool) {
        self.stall_acquires = stall;
    }

    /// Returns the recorded operations in call order.
    #[must_use]
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    /// Validates that the given image is the acquired one.
    fn check_acquired(
        &self,
        call: &'static str,
        swapchain: SwapchainHandle,
        image_index: u32,
    ) -> Result<(), RenderError> {
        if self.acquired == Some((swapchain, image_index)) {
            Ok(())
        } else {
            Err(RenderError::Backend {
                call,
                reason: format!("image {image_index} of {swapchain} is not acquired"),
            })
        }
    }
}

impl RenderBackend for ScriptedRenderBackend {
    fn supported_formats(&self) -> Vec<ImageFormat> {
        self.formats.clone()
    }

    fn acquire_image(
        &mut self,
        swapchain: SwapchainHandle,
        timeout: Duration,
    ) -> Result<u32, RenderError> {
        if self.stall_acquires {
            return Err(RenderError::AcquireTimeout {
                swapchain,
                waited: timeout,
            });
        }
        if let Some((held, _)) = self.acquired {
            return Err(RenderError::Backend {
                call: "acquire_image",
                reason: format!("image of {held} is still acquired"),
            });
        }
        self.acquired = Some((swapchain, 0));
        self.operations.push(format!("acquire {swapchain}"));
        Ok(0)
    }

    fn clear_image(
        &mut self,
        swapchain: SwapchainHandle,
        image_index: u32,
        color: Color4f,
    ) -> Result<(), RenderError> {
        self.check_acquired("clear_image", swapchain, image_index)?;
        self.operations.push(format!(
            "clear {swapchain} ({:.1},{:.1},{:.1},{:.1})",
            color.r, color.g, color.b, color.a
        ));
        Ok(())
    }

    fn draw_text(
        &mut self,
        swapchain: SwapchainHandle,
        image_index: u32,
        text: &str,
    ) -> Result<(), RenderError> {
        self.check_acquired("draw_text", swapchain, image_index)?;
        self.operations.push(format!("draw {swapchain} \"{text}\""));
        Ok(())
    }

    fn release_image(
        &mut self,
        swapchain: SwapchainHandle,
        image_index: u32,
    ) -> Result<(), RenderError> {
        self.check_acquired("release_image", swapchain, image_index)?;
        self.acquired = None;
        self.operations.push(format!("release {swapchain}"));
        Ok(())
    }
}
