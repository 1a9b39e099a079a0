// conformance-core/src/core/types.rs
// ============================================================================
// Module: Conformance Value Types
// Description: Session, frame, input, pose, and composition value types.
// Purpose: Model the device API's wire shapes without backend specifics.
// Dependencies: crate::core::{identifiers, time}, serde
// ============================================================================

//! ## Overview
//! These are the fixed-shape values exchanged with the device runtime and the
//! rendering collaborator: API versions, session lifecycle states, frame
//! timing, boolean action states, poses, and composition layers. All are
//! plain data; behavior lives in the runtime modules.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ActionHandle;
use crate::core::identifiers::InputPath;
use crate::core::identifiers::SpaceHandle;
use crate::core::identifiers::SwapchainHandle;
use crate::core::time::RuntimeTime;

// ============================================================================
// SECTION: API Version
// ============================================================================

/// A specification version reported or requested during negotiation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct ApiVersion {
    /// Major version number.
    pub major: u16,
    /// Minor version number.
    pub minor: u16,
    /// Patch version number; ignored for feature negotiation.
    pub patch: u32,
}

impl ApiVersion {
    /// Specification version 1.0.
    pub const V1_0: Self = Self::new(1, 0, 0);
    /// Specification version 1.1.
    pub const V1_1: Self = Self::new(1, 1, 0);

    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// ============================================================================
// SECTION: Session Configuration
// ============================================================================

/// Physical form factor the session targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormFactor {
    /// Head-mounted display.
    #[default]
    HeadMountedDisplay,
    /// Handheld display.
    Handheld,
}

impl FormFactor {
    /// Returns a stable label for the form factor.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeadMountedDisplay => "hmd",
            Self::Handheld => "handheld",
        }
    }
}

/// Primary view configuration of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewConfigurationKind {
    /// Two views, one per eye.
    #[default]
    Stereo,
    /// A single view.
    Mono,
}

impl ViewConfigurationKind {
    /// Returns the number of views submitted per frame.
    #[must_use]
    pub const fn view_count(self) -> usize {
        match self {
            Self::Stereo => 2,
            Self::Mono => 1,
        }
    }

    /// Returns a stable label for the view configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stereo => "stereo",
            Self::Mono => "mono",
        }
    }
}

/// How submitted layers blend with the user's environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentBlendMode {
    /// Layers fully replace the environment.
    #[default]
    Opaque,
    /// Layers are added over the environment.
    Additive,
    /// Layers alpha-blend with the environment.
    AlphaBlend,
}

impl EnvironmentBlendMode {
    /// Returns a stable label for the blend mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opaque => "opaque",
            Self::Additive => "additive",
            Self::AlphaBlend => "alphablend",
        }
    }
}

// ============================================================================
// SECTION: Session Lifecycle
// ============================================================================

/// Session lifecycle state, driven entirely by state-change events read from
/// the orchestrator's private event cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Session exists but the runtime is not ready to begin it.
    #[default]
    Idle,
    /// The runtime is ready for the session to begin.
    Ready,
    /// The frame loop is synchronized with the display.
    Synchronized,
    /// Rendered frames are visible to the user.
    Visible,
    /// The session has input focus.
    Focused,
    /// The session is stopping, exiting, or the instance is about to be lost.
    StoppingOrLost,
}

impl SessionState {
    /// Returns a stable label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Ready => "ready",
            Self::Synchronized => "synchronized",
            Self::Visible => "visible",
            Self::Focused => "focused",
            Self::StoppingOrLost => "stopping_or_lost",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Result Codes
// ============================================================================

/// Result code reported by a runtime call.
///
/// A code outside the documented allowed set for a call is a protocol error,
/// fatal to the current test and never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeStatus {
    /// The call succeeded.
    Success,
    /// A bounded wait inside the runtime expired.
    TimeoutExpired,
    /// The session is about to be lost.
    SessionLossPending,
    /// The frame was discarded rather than displayed.
    FrameDiscarded,
    /// The call requires a running session.
    SessionNotRunning,
    /// The call arrived out of lifecycle order.
    CallOrderInvalid,
    /// A handle did not refer to a live object.
    HandleInvalid,
    /// Action sets were already attached to the session.
    ActionSetsAlreadyAttached,
    /// A capability required by the call is not enabled.
    FeatureUnsupported,
    /// A runtime resource limit was reached.
    LimitReached,
}

impl RuntimeStatus {
    /// Returns a stable label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::TimeoutExpired => "timeout_expired",
            Self::SessionLossPending => "session_loss_pending",
            Self::FrameDiscarded => "frame_discarded",
            Self::SessionNotRunning => "session_not_running",
            Self::CallOrderInvalid => "call_order_invalid",
            Self::HandleInvalid => "handle_invalid",
            Self::ActionSetsAlreadyAttached => "action_sets_already_attached",
            Self::FeatureUnsupported => "feature_unsupported",
            Self::LimitReached => "limit_reached",
        }
    }
}

impl fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Frame Timing
// ============================================================================

/// Frame timing data produced by the wait-frame call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameState {
    /// Predicted display time of the frame being prepared.
    pub predicted_display_time: RuntimeTime,
    /// Predicted interval until the following frame's display time.
    pub predicted_display_period: Duration,
    /// Whether the runtime will display rendered content this frame.
    pub should_render: bool,
}

// ============================================================================
// SECTION: Input
// ============================================================================

/// Kind of value an action produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// A boolean input such as a click.
    Boolean,
    /// A tracked pose input.
    Pose,
}

/// Sampled state of a boolean action after an action sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanActionState {
    /// Current value of the action.
    pub current: bool,
    /// True when the value changed during the most recent sync.
    pub changed_since_last_sync: bool,
    /// True when some bound input is actively providing this action.
    pub is_active: bool,
}

/// One suggested (input path -> action) pairing, scoped to an interaction
/// profile by the binder that accumulates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBinding {
    /// Action receiving the input.
    pub action: ActionHandle,
    /// Logical input source path.
    pub binding: InputPath,
}

// ============================================================================
// SECTION: Geometry
// ============================================================================

/// A three-component vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3f {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vector3f {
    /// Creates a vector from components.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
        }
    }
}

/// A rotation quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternionf {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// W component.
    pub w: f32,
}

impl Quaternionf {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Returns the Hamilton product `self * other`.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            x: self.w.mul_add(other.x, self.x.mul_add(other.w, self.y.mul_add(other.z, -(self.z * other.y)))),
            y: self.w.mul_add(other.y, self.y.mul_add(other.w, self.z.mul_add(other.x, -(self.x * other.z)))),
            z: self.w.mul_add(other.z, self.z.mul_add(other.w, self.x.mul_add(other.y, -(self.y * other.x)))),
            w: self.w.mul_add(other.w, -self.x.mul_add(other.x, self.y.mul_add(other.y, self.z * other.z))),
        }
    }

    /// Rotates a vector by this quaternion.
    #[must_use]
    pub fn rotate(&self, v: &Vector3f) -> Vector3f {
        // v' = v + 2w(u x v) + 2(u x (u x v)) with u the vector part.
        let ux = self.y.mul_add(v.z, -(self.z * v.y));
        let uy = self.z.mul_add(v.x, -(self.x * v.z));
        let uz = self.x.mul_add(v.y, -(self.y * v.x));
        let uux = self.y.mul_add(uz, -(self.z * uy));
        let uuy = self.z.mul_add(ux, -(self.x * uz));
        let uuz = self.x.mul_add(uy, -(self.y * ux));
        Vector3f {
            x: 2.0f32.mul_add(self.w.mul_add(ux, uux), v.x),
            y: 2.0f32.mul_add(self.w.mul_add(uy, uuy), v.y),
            z: 2.0f32.mul_add(self.w.mul_add(uz, uuz), v.z),
        }
    }
}

impl Default for Quaternionf {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A rigid transform: rotation plus translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Posef {
    /// Rotation component.
    pub orientation: Quaternionf,
    /// Translation component.
    pub position: Vector3f,
}

impl Posef {
    /// The identity pose.
    pub const IDENTITY: Self = Self {
        orientation: Quaternionf::IDENTITY,
        position: Vector3f::new(0.0, 0.0, 0.0),
    };

    /// Creates a pose from an orientation and position.
    #[must_use]
    pub const fn new(orientation: Quaternionf, position: Vector3f) -> Self {
        Self {
            orientation,
            position,
        }
    }

    /// Creates a translation-only pose.
    #[must_use]
    pub const fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            orientation: Quaternionf::IDENTITY,
            position: Vector3f::new(x, y, z),
        }
    }

    /// Composes this pose with a local offset: the result places `local`
    /// within this pose's frame of reference.
    #[must_use]
    pub fn transform(&self, local: &Self) -> Self {
        let rotated = self.orientation.rotate(&local.position);
        Self {
            orientation: self.orientation.multiply(&local.orientation),
            position: Vector3f {
                x: self.position.x + rotated.x,
                y: self.position.y + rotated.y,
                z: self.position.z + rotated.z,
            },
        }
    }
}

// ============================================================================
// SECTION: Images and Swapchains
// ============================================================================

/// Pixel format of a swapchain image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// 8-bit RGBA, linear.
    Rgba8,
    /// 8-bit RGBA, sRGB-encoded.
    Rgba8Srgb,
    /// 8-bit BGRA, linear.
    Bgra8,
    /// 8-bit BGRA, sRGB-encoded.
    Bgra8Srgb,
    /// 16-bit depth.
    Depth16,
}

impl ImageFormat {
    /// Returns a stable label for the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgba8 => "rgba8",
            Self::Rgba8Srgb => "rgba8_srgb",
            Self::Bgra8 => "bgra8",
            Self::Bgra8Srgb => "bgra8_srgb",
            Self::Depth16 => "depth16",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pixel dimensions of a swapchain image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent2D {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Extent2D {
    /// Creates an extent from width and height.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
        }
    }
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color4f {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color4f {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a,
        }
    }
}

/// Parameters for creating a swapchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapchainCreateInfo {
    /// Pixel format of the images.
    pub format: ImageFormat,
    /// Pixel dimensions of the images.
    pub extent: Extent2D,
}

/// Reference space kinds the harness creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSpaceType {
    /// Head-locked space following the display.
    View,
    /// World-locked space anchored near the user's start position.
    Local,
    /// World-locked space anchored to the play area.
    Stage,
}

impl ReferenceSpaceType {
    /// Returns a stable label for the space type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Local => "local",
            Self::Stage => "stage",
        }
    }
}

// ============================================================================
// SECTION: Composition Layers
// ============================================================================

/// One composition layer submitted at end-frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CompositionLayer {
    /// A projected layer covering the full view.
    Projection {
        /// Space the projection is rendered in.
        space: SpaceHandle,
        /// Swapchain holding the projected images.
        swapchain: SwapchainHandle,
    },
    /// A quad floating in the given space.
    Quad {
        /// Swapchain holding the quad image.
        swapchain: SwapchainHandle,
        /// Space the quad is anchored to.
        space: SpaceHandle,
        /// Pose of the quad within the space.
        pose: Posef,
        /// Width of the quad in meters.
        width: f32,
    },
}

/// A pre-built quad layer the interactive controller repositions and submits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadLayer {
    /// Swapchain holding the quad image.
    pub swapchain: SwapchainHandle,
    /// Space the quad is anchored to.
    pub space: SpaceHandle,
    /// Pose of the quad within the space.
    pub pose: Posef,
    /// Width of the quad in meters.
    pub width: f32,
}

impl QuadLayer {
    /// Converts this quad into a composition layer for submission.
    #[must_use]
    pub const fn to_layer(&self) -> CompositionLayer {
        CompositionLayer::Quad {
            swapchain: self.swapchain,
            space: self.space,
            pose: self.pose,
            width: self.width,
        }
    }
}
