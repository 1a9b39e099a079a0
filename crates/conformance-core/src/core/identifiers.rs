// conformance-core/src/core/identifiers.rs
// ============================================================================
// Module: Conformance Handles and Paths
// Description: Opaque runtime handles and semantic path identifiers.
// Purpose: Provide strongly typed, serializable wrappers with stable forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The device runtime hands out opaque 64-bit handles; the harness never
//! interprets their values, only passes them back. Semantic paths (interaction
//! profiles, input sources) are opaque strings resolved by the runtime.
//! Validation happens at the runtime boundary, not inside these wrappers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Handle Types
// ============================================================================

/// Declares an opaque 64-bit runtime handle newtype.
macro_rules! runtime_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw handle value produced by the runtime.
            #[must_use]
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw handle value.
            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#x}", self.0)
            }
        }
    };
}

runtime_handle! {
    /// Handle to the runtime instance binding.
    InstanceHandle
}

runtime_handle! {
    /// Handle to one active device-application session.
    SessionHandle
}

runtime_handle! {
    /// Handle to a swapchain of target images.
    SwapchainHandle
}

runtime_handle! {
    /// Handle to a reference or action space.
    SpaceHandle
}

runtime_handle! {
    /// Handle to a single input action.
    ActionHandle
}

runtime_handle! {
    /// Handle to a named group of input actions.
    ActionSetHandle
}

// ============================================================================
// SECTION: Path Types
// ============================================================================

/// Interaction profile identifier, e.g.
/// `/interaction_profiles/khr/simple_controller`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfilePath(String);

impl ProfilePath {
    /// Creates a new interaction profile path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ProfilePath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProfilePath {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Logical input source path, e.g. `/user/hand/left/input/select/click`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputPath(String);

impl InputPath {
    /// Creates a new input source path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for InputPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for InputPath {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
