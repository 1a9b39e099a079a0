// conformance-core/src/lib.rs
// ============================================================================
// Module: Conformance Core Library
// Description: Reusable framework every conformance test rides on top of.
// Purpose: Wire together capability negotiation, event multiplexing, and
//          session orchestration behind backend-agnostic interfaces.
// Dependencies: crate::{core, error, events, interfaces, negotiate, report,
//              runtime, sim}
// ============================================================================

//! ## Overview
//! `conformance-core` is the harness framework for driving a spatial/XR device
//! runtime through its instance/session/frame lifecycle. Tests configure
//! required features, the negotiation layer decides whether to proceed, and
//! the session orchestrator binds input actions, waits for session readiness,
//! and iterates the frame cycle. Interactive tests layer a
//! Scene/Help/Complete decision point on top.
//!
//! The device runtime and the rendering backend are external collaborators
//! behind the [`interfaces`] traits; a deterministic scripted implementation
//! lives in [`sim`] for tests and headless smoke runs.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod core;
pub mod error;
pub mod events;
pub mod interfaces;
pub mod negotiate;
pub mod report;
pub mod runtime;
pub mod sim;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::ActionBinding;
pub use core::ActionHandle;
pub use core::ActionKind;
pub use core::ActionSetHandle;
pub use core::ApiVersion;
pub use core::BooleanActionState;
pub use core::Color4f;
pub use core::CompositionLayer;
pub use core::EnvironmentBlendMode;
pub use core::EventData;
pub use core::EventRecord;
pub use core::Extent2D;
pub use core::FormFactor;
pub use core::FrameState;
pub use core::ImageFormat;
pub use core::InputPath;
pub use core::InstanceHandle;
pub use core::Posef;
pub use core::ProfilePath;
pub use core::QuadLayer;
pub use core::Quaternionf;
pub use core::ReferenceSpaceType;
pub use core::RuntimeStatus;
pub use core::RuntimeTime;
pub use core::SessionHandle;
pub use core::SessionState;
pub use core::SpaceHandle;
pub use core::SwapchainCreateInfo;
pub use core::SwapchainHandle;
pub use core::Vector3f;
pub use core::ViewConfigurationKind;
pub use error::HarnessResult;
pub use error::TestFailure;
pub use events::EventCursor;
pub use events::EventLog;
pub use interfaces::DeviceRuntime;
pub use interfaces::EventSource;
pub use interfaces::RenderBackend;
pub use interfaces::RenderError;
pub use interfaces::RuntimeError;
pub use negotiate::fold_extension_names;
pub use negotiate::require_any;
pub use negotiate::require_features;
pub use negotiate::runtime_feature_set;
pub use report::ConformanceReport;
pub use report::HarnessContext;
pub use report::TestOutcome;
pub use runtime::ActionBinder;
pub use runtime::FrameLoop;
pub use runtime::InteractiveMode;
pub use runtime::InteractiveModeController;
pub use runtime::SessionOrchestrator;
pub use runtime::Timeouts;
pub use runtime::wait_until;
