// feature-avail/src/feature.rs
// ============================================================================
// Module: Feature Enumeration
// Description: Build-time enumeration of core versions and extensions.
// Purpose: Define `Feature` with stable bit indices and the name<->bit lookup.
// Dependencies: serde::{Deserialize, Serialize}
// ============================================================================

//! ## Overview
//! Every capability the harness can negotiate over is one `Feature`: either a
//! core specification version or an optional extension. Each feature carries a
//! stable small bit index into the fixed-width vector used by
//! [`crate::FeatureSet`]. Adding a feature means appending a variant here; the
//! bit width is fixed at build time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Feature Definition
// ============================================================================

/// One negotiable capability: a core specification version or an extension.
///
/// The discriminant of each variant is its bit index in a
/// [`crate::FeatureSet`]. Indices are stable; new features are appended, never
/// inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Feature {
    /// Core specification version 1.0.
    Version1_0 = 0,
    /// Loader/negotiation API version 1.0 (ships as a separate header).
    LoaderVersion1_0 = 1,
    /// Core specification version 1.1.
    Version1_1 = 2,
    /// OpenGL graphics binding extension.
    KhrOpenglEnable = 3,
    /// Vulkan graphics binding extension (revision 2).
    KhrVulkanEnable2 = 4,
    /// Direct3D 11 graphics binding extension.
    KhrD3d11Enable = 5,
    /// Direct3D 12 graphics binding extension.
    KhrD3d12Enable = 6,
    /// Depth-submitting composition layer extension.
    KhrCompositionLayerDepth = 7,
    /// Visibility mask extension.
    KhrVisibilityMask = 8,
    /// Headless (no graphics) session extension.
    MndHeadless = 9,
    /// Debug utilities extension.
    ExtDebugUtils = 10,
    /// Hand tracking extension.
    ExtHandTracking = 11,
    /// Eye gaze interaction extension.
    ExtEyeGazeInteraction = 12,
    /// Local floor reference space extension.
    ExtLocalFloor = 13,
    /// Hand interaction profile extension.
    MsftHandInteraction = 14,
    /// Display refresh rate extension.
    FbDisplayRefreshRate = 15,
    /// Quad views view configuration extension.
    VarjoQuadViews = 16,
}

impl Feature {
    /// Total number of features known at build time.
    pub const COUNT: usize = Self::ALL.len();

    /// Every feature, in bit-index order.
    pub const ALL: [Self; 17] = [
        Self::Version1_0,
        Self::LoaderVersion1_0,
        Self::Version1_1,
        Self::KhrOpenglEnable,
        Self::KhrVulkanEnable2,
        Self::KhrD3d11Enable,
        Self::KhrD3d12Enable,
        Self::KhrCompositionLayerDepth,
        Self::KhrVisibilityMask,
        Self::MndHeadless,
        Self::ExtDebugUtils,
        Self::ExtHandTracking,
        Self::ExtEyeGazeInteraction,
        Self::ExtLocalFloor,
        Self::MsftHandInteraction,
        Self::FbDisplayRefreshRate,
        Self::VarjoQuadViews,
    ];

    /// Returns the stable bit index of this feature.
    #[must_use]
    pub const fn bit_index(self) -> u16 {
        self as u16
    }

    /// Returns the feature for a bit index, if the index is in range.
    #[must_use]
    pub fn from_bit_index(index: u16) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Returns true when this feature is a core or loader version rather than
    /// an extension.
    #[must_use]
    pub const fn is_version(self) -> bool {
        matches!(self, Self::Version1_0 | Self::LoaderVersion1_0 | Self::Version1_1)
    }

    /// Returns the external string name of this feature.
    ///
    /// Version features render in `XR_VERSION_x_y` form; extensions use their
    /// registered extension name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Version1_0 => "XR_VERSION_1_0",
            Self::LoaderVersion1_0 => "XR_LOADER_VERSION_1_0",
            Self::Version1_1 => "XR_VERSION_1_1",
            Self::KhrOpenglEnable => "XR_KHR_opengl_enable",
            Self::KhrVulkanEnable2 => "XR_KHR_vulkan_enable2",
            Self::KhrD3d11Enable => "XR_KHR_D3D11_enable",
            Self::KhrD3d12Enable => "XR_KHR_D3D12_enable",
            Self::KhrCompositionLayerDepth => "XR_KHR_composition_layer_depth",
            Self::KhrVisibilityMask => "XR_KHR_visibility_mask",
            Self::MndHeadless => "XR_MND_headless",
            Self::ExtDebugUtils => "XR_EXT_debug_utils",
            Self::ExtHandTracking => "XR_EXT_hand_tracking",
            Self::ExtEyeGazeInteraction => "XR_EXT_eye_gaze_interaction",
            Self::ExtLocalFloor => "XR_EXT_local_floor",
            Self::MsftHandInteraction => "XR_MSFT_hand_interaction",
            Self::FbDisplayRefreshRate => "XR_FB_display_refresh_rate",
            Self::VarjoQuadViews => "XR_VARJO_quad_views",
        }
    }

    /// Looks up a feature by its external string name.
    ///
    /// Returns `None` when the name is unknown; callers folding enumerated
    /// extension lists are expected to skip unknown names rather than fail.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|feature| feature.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SECTION: Parse Errors
// ============================================================================

/// Errors that can occur while parsing a [`Feature`] from its string name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureParseError {
    /// The provided name does not match any known feature.
    UnknownName {
        /// The name that failed to resolve.
        name: String,
    },
}

impl fmt::Display for FeatureParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownName {
                name,
            } => write!(f, "unknown feature name: {name}"),
        }
    }
}

impl std::error::Error for FeatureParseError {}

impl std::str::FromStr for Feature {
    type Err = FeatureParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_name(value).ok_or_else(|| FeatureParseError::UnknownName {
            name: value.to_owned(),
        })
    }
}
