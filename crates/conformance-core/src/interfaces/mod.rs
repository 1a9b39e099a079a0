// conformance-core/src/interfaces/mod.rs
// ============================================================================
// Module: Conformance Interfaces
// Description: Backend-agnostic interfaces for the runtime and renderer.
// Purpose: Define the contract surfaces consumed by the session orchestrator.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the harness integrates with the device runtime and
//! the per-backend rendering adapter without embedding backend-specific
//! details. Every runtime call returns a typed result; a status outside the
//! documented allowed set for a call is a protocol error, fatal to the
//! current test and never retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

use crate::core::ActionBinding;
use crate::core::ActionHandle;
use crate::core::ActionKind;
use crate::core::ActionSetHandle;
use crate::core::ApiVersion;
use crate::core::BooleanActionState;
use crate::core::Color4f;
use crate::core::CompositionLayer;
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
use crate::core::SpaceHandle;
use crate::core::SwapchainCreateInfo;
use crate::core::SwapchainHandle;
use crate::core::ViewConfigurationKind;

// ============================================================================
// SECTION: Event Source
// ============================================================================

/// The runtime's poll primitive: one more event, or none right now.
///
/// The event log drains this in a loop under its lock; implementations only
/// need to hand out events in emission order.
pub trait EventSource: Send {
    /// Returns the next pending event, or `None` when the queue is empty.
    fn poll_event(&mut self) -> Option<EventRecord>;
}

// ============================================================================
// SECTION: Runtime Errors
// ============================================================================

/// Errors reported by device runtime calls.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The call returned a status outside its documented allowed set.
    #[error("{call} returned unexpected status: {status}")]
    UnexpectedStatus {
        /// Name of the runtime call.
        call: &'static str,
        /// The status actually returned.
        status: RuntimeStatus,
    },
    /// The runtime rejected the call outright.
    #[error("{call} rejected: {reason}")]
    Rejected {
        /// Name of the runtime call.
        call: &'static str,
        /// Runtime-provided rejection reason.
        reason: String,
    },
}

// ============================================================================
// SECTION: Device Runtime
// ============================================================================

/// The device runtime under test, as seen by the session orchestrator.
///
/// One implementation exists per real runtime binding plus the scripted
/// runtime in [`crate::sim`]. All methods take `&mut self`: the harness runs
/// one logical test thread, and the runtime serializes its own internals.
pub trait DeviceRuntime {
    /// Returns the runtime's self-reported name.
    fn runtime_name(&self) -> String;

    /// Returns the negotiated specification version.
    fn api_version(&self) -> ApiVersion;

    /// Enumerates the extension names the runtime supports.
    fn available_extensions(&self) -> Vec<String>;

    /// Enumerates the extension names enabled on the instance.
    fn enabled_extensions(&self) -> Vec<String>;

    /// Creates the poll source for the instance's event stream.
    ///
    /// Called once, when the event log for the instance is created.
    fn create_event_source(&mut self) -> Box<dyn EventSource + Send>;

    /// Creates a session for the given form factor and view configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the system is unavailable.
    fn create_session(
        &mut self,
        form_factor: FormFactor,
        view_configuration: ViewConfigurationKind,
    ) -> Result<SessionHandle, RuntimeError>;

    /// Begins the session; valid only in the ready state.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when called out of lifecycle order.
    fn begin_session(&mut self, session: SessionHandle) -> Result<(), RuntimeError>;

    /// Asks the runtime to wind the session down.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the session is not running.
    fn request_exit(&mut self, session: SessionHandle) -> Result<(), RuntimeError>;

    /// Ends a stopping session.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when called out of lifecycle order.
    fn end_session(&mut self, session: SessionHandle) -> Result<(), RuntimeError>;

    /// Destroys the session and everything owned by it.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the handle is not live.
    fn destroy_session(&mut self, session: SessionHandle) -> Result<(), RuntimeError>;

    /// Blocks until the next frame's timing data is available.
    ///
    /// May block for up to a frame interval; longer stalls are the runtime's
    /// own timeout to report.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the session is not running.
    fn wait_frame(&mut self, session: SessionHandle) -> Result<FrameState, RuntimeError>;

    /// Marks the start of rendering work for the waited frame.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when called without a prior wait.
    fn begin_frame(&mut self, session: SessionHandle) -> Result<(), RuntimeError>;

    /// Submits the frame's composition layers for display.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when called without a prior begin.
    fn end_frame(
        &mut self,
        session: SessionHandle,
        display_time: RuntimeTime,
        layers: &[CompositionLayer],
    ) -> Result<(), RuntimeError>;

    /// Creates a named action set.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the name is invalid or limits are hit.
    fn create_action_set(&mut self, name: &str) -> Result<ActionSetHandle, RuntimeError>;

    /// Creates a named action within a set.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the set is not live or limits are hit.
    fn create_action(
        &mut self,
        set: ActionSetHandle,
        name: &str,
        kind: ActionKind,
    ) -> Result<ActionHandle, RuntimeError>;

    /// Suggests one interaction profile's bindings as a single atomic call.
    ///
    /// Suggestion order across profiles is significant; some runtimes use
    /// last-write-wins or first-match semantics.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when action sets were already attached.
    fn suggest_bindings(
        &mut self,
        profile: &ProfilePath,
        bindings: &[ActionBinding],
    ) -> Result<(), RuntimeError>;

    /// Attaches action sets to the session, freezing their bindings.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] on re-attachment.
    fn attach_action_sets(
        &mut self,
        session: SessionHandle,
        sets: &[ActionSetHandle],
    ) -> Result<(), RuntimeError>;

    /// Synchronizes action state for the attached sets.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when no sets are attached.
    fn sync_actions(
        &mut self,
        session: SessionHandle,
        sets: &[ActionSetHandle],
    ) -> Result<(), RuntimeError>;

    /// Samples a boolean action's state as of the last sync.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the action is not attached.
    fn action_state_boolean(
        &mut self,
        session: SessionHandle,
        action: ActionHandle,
    ) -> Result<BooleanActionState, RuntimeError>;

    /// Creates a reference space with the given pose offset.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the space type is unsupported.
    fn create_reference_space(
        &mut self,
        session: SessionHandle,
        space_type: ReferenceSpaceType,
        pose: Posef,
    ) -> Result<SpaceHandle, RuntimeError>;

    /// Destroys a space.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the handle is not live.
    fn destroy_space(&mut self, space: SpaceHandle) -> Result<(), RuntimeError>;

    /// Locates one space in another at the given time.
    ///
    /// Returns `Ok(None)` when the pose cannot currently be resolved; that is
    /// an expected condition, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when a handle is not live.
    fn locate_space(
        &mut self,
        space: SpaceHandle,
        base: SpaceHandle,
        time: RuntimeTime,
    ) -> Result<Option<Posef>, RuntimeError>;

    /// Creates a swapchain of target images.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the format is unsupported.
    fn create_swapchain(
        &mut self,
        session: SessionHandle,
        info: &SwapchainCreateInfo,
    ) -> Result<SwapchainHandle, RuntimeError>;

    /// Destroys a swapchain.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the handle is not live.
    fn destroy_swapchain(&mut self, swapchain: SwapchainHandle) -> Result<(), RuntimeError>;

    /// Destroys an action set and its actions.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError`] when the handle is not live.
    fn destroy_action_set(&mut self, set: ActionSetHandle) -> Result<(), RuntimeError>;
}

// ============================================================================
// SECTION: Render Backend
// ============================================================================

/// Errors reported by the rendering collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Waiting for an image exceeded the explicit acquire timeout.
    #[error("image acquire timed out after {}ms on swapchain {swapchain}", waited.as_millis())]
    AcquireTimeout {
        /// Swapchain whose image acquisition stalled.
        swapchain: SwapchainHandle,
        /// How long the wait lasted before giving up.
        waited: Duration,
    },
    /// The backend reports no color format the harness can use.
    #[error("render backend reports no usable color format")]
    NoColorFormat,
    /// The backend failed an operation.
    #[error("render backend failure in {call}: {reason}")]
    Backend {
        /// Name of the backend operation.
        call: &'static str,
        /// Backend-provided failure reason.
        reason: String,
    },
}

/// The rendering collaborator: acquire, clear, draw into, and release one
/// target image at a time.
///
/// Invoked once per view per frame by the session orchestrator; never called
/// concurrently for the same target.
pub trait RenderBackend {
    /// Reports the pixel formats this backend can render to.
    fn supported_formats(&self) -> Vec<ImageFormat>;

    /// Acquires the next image of a swapchain, waiting up to `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::AcquireTimeout`] when the wait stalls past the
    /// explicit timeout.
    fn acquire_image(
        &mut self,
        swapchain: SwapchainHandle,
        timeout: Duration,
    ) -> Result<u32, RenderError>;

    /// Clears an acquired image to a solid color.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the image is not acquired.
    fn clear_image(
        &mut self,
        swapchain: SwapchainHandle,
        image_index: u32,
        color: Color4f,
    ) -> Result<(), RenderError>;

    /// Draws text into an acquired image.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the image is not acquired.
    fn draw_text(
        &mut self,
        swapchain: SwapchainHandle,
        image_index: u32,
        text: &str,
    ) -> Result<(), RenderError>;

    /// Releases an acquired image back to the swapchain.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the image is not acquired.
    fn release_image(
        &mut self,
        swapchain: SwapchainHandle,
        image_index: u32,
    ) -> Result<(), RenderError>;
}
