// conformance-config/tests/options_validation.rs
// ============================================================================
// Module: Options Validation Tests
// Description: Tests for fail-closed option validation and defaults.
// ============================================================================
//! ## Overview
//! Validates that the default option set is valid, that invalid combinations
//! are rejected with precise messages, and that conversions into harness
//! types preserve values.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap on deterministic fixtures."
)]

use std::time::Duration;

use conformance_config::ConfigError;
use conformance_config::DEFAULT_INTERACTION_PROFILE;
use conformance_config::GraphicsBackend;
use conformance_config::Options;

// ============================================================================
// SECTION: Defaults
// ============================================================================

#[test]
fn test_defaults_are_valid() {
    let options = Options::default();
    options.validate().unwrap();
    assert_eq!(options.graphics_backend, GraphicsBackend::Null);
    assert_eq!(
        options.enabled_interaction_profiles,
        vec![DEFAULT_INTERACTION_PROFILE.to_owned()]
    );
}

#[test]
fn test_default_timeouts_convert_to_durations() {
    let timeouts = Options::default().harness_timeouts();
    assert_eq!(timeouts.state_transition, Duration::from_secs(10));
    assert_eq!(timeouts.poll_delay, Duration::from_millis(5));
}

#[test]
fn test_interaction_profiles_convert_to_typed_paths() {
    let options = Options::default();
    let profiles = options.interaction_profiles();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].as_str(), DEFAULT_INTERACTION_PROFILE);
}

// ============================================================================
// SECTION: Rejections
// ============================================================================

#[test]
fn test_empty_profile_list_is_rejected() {
    let mut options = Options::default();
    options.enabled_interaction_profiles.clear();
    let error = options.validate().unwrap_err();
    assert!(matches!(error, ConfigError::Invalid(_)));
}

#[test]
fn test_malformed_profile_path_is_rejected() {
    let mut options = Options::default();
    options.enabled_interaction_profiles = vec!["khr/simple_controller".to_owned()];
    let error = options.validate().unwrap_err();
    assert!(error.to_string().contains("/interaction_profiles/"));
}

#[test]
fn test_malformed_extension_name_is_rejected() {
    let mut options = Options::default();
    options.enabled_instance_extensions = vec!["KHR_opengl_enable".to_owned()];
    let error = options.validate().unwrap_err();
    assert!(error.to_string().contains("XR_"));
}

#[test]
fn test_zero_timeout_is_rejected() {
    let mut options = Options::default();
    options.timeouts.image_acquire_ms = 0;
    let error = options.validate().unwrap_err();
    assert!(error.to_string().contains("non-zero"));
}

#[test]
fn test_poll_delay_longer_than_state_bound_is_rejected() {
    let mut options = Options::default();
    options.timeouts.poll_delay_ms = 60_000;
    options.timeouts.state_transition_ms = 1_000;
    let error = options.validate().unwrap_err();
    assert!(error.to_string().contains("poll delay"));
}

// ============================================================================
// SECTION: Description
// ============================================================================

#[test]
fn test_describe_names_the_selected_options() {
    let mut options = Options::default();
    options.graphics_backend = GraphicsBackend::Vulkan;
    options.random_seed = 1234;
    let description = options.describe();
    assert!(description.contains("backend=vulkan"));
    assert!(description.contains("seed=1234"));
    assert!(description.contains(DEFAULT_INTERACTION_PROFILE));
}
