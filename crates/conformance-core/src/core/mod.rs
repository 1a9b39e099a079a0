// conformance-core/src/core/mod.rs
// ============================================================================
// Module: Conformance Core Types
// Description: Canonical domain types for the conformance harness.
// Purpose: Provide stable, serializable handle, time, and value types.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types mirror the device API's wire shapes: opaque handles, the
//! nanosecond runtime clock, session lifecycle states, event records, and the
//! small value types exchanged with the rendering collaborator. These types
//! are the canonical source of truth for every other module in the crate.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod event;
pub mod identifiers;
pub mod time;
pub mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use event::EventData;
pub use event::EventRecord;
pub use identifiers::ActionHandle;
pub use identifiers::ActionSetHandle;
pub use identifiers::InputPath;
pub use identifiers::InstanceHandle;
pub use identifiers::ProfilePath;
pub use identifiers::SessionHandle;
pub use identifiers::SpaceHandle;
pub use identifiers::SwapchainHandle;
pub use time::RuntimeTime;
pub use types::ActionBinding;
pub use types::ActionKind;
pub use types::ApiVersion;
pub use types::BooleanActionState;
pub use types::Color4f;
pub use types::CompositionLayer;
pub use types::EnvironmentBlendMode;
pub use types::Extent2D;
pub use types::FormFactor;
pub use types::FrameState;
pub use types::ImageFormat;
pub use types::Posef;
pub use types::QuadLayer;
pub use types::Quaternionf;
pub use types::ReferenceSpaceType;
pub use types::RuntimeStatus;
pub use types::SessionState;
pub use types::SwapchainCreateInfo;
pub use types::Vector3f;
pub use types::ViewConfigurationKind;
