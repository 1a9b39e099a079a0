// conformance-config/src/lib.rs
// ============================================================================
// Module: Conformance Config Library
// Description: Canonical options model, validation, and TOML loading.
// Purpose: Single source of truth for harness run configuration semantics.
// Dependencies: conformance-core, serde, toml
// ============================================================================

//! ## Overview
//! `conformance-config` defines the canonical options model for a harness
//! run: rendering backend, form factor, view configuration, blend mode,
//! extension and interaction-profile selection, the random seed, and the
//! bounded-wait policy. Loading is strict and fail-closed: unknown keys,
//! oversized files, and invalid combinations are rejected before a run
//! starts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
