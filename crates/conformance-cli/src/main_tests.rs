// conformance-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Parsing Tests
// Description: Tests for flag parsing and option resolution.
// ============================================================================
//! ## Overview
//! Validates flag-to-option mapping, override precedence, and validation
//! failures surfacing as config errors.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap on deterministic fixtures."
)]

use clap::Parser;
use conformance_config::GraphicsBackend;
use conformance_core::core::FormFactor;

use crate::Cli;
use crate::CliError;
use crate::resolve_options;

#[test]
fn test_defaults_resolve_without_flags() {
    let cli = Cli::parse_from(["conformance-cli"]);
    let options = resolve_options(&cli).unwrap();
    assert_eq!(options, conformance_config::Options::default());
}

#[test]
fn test_flags_override_defaults() {
    let cli = Cli::parse_from([
        "conformance-cli",
        "--graphics-plugin",
        "vulkan",
        "--form-factor",
        "handheld",
        "--seed",
        "77",
        "--interaction-profiles",
        "/interaction_profiles/khr/simple_controller",
        "--interaction-profiles",
        "/interaction_profiles/ext/hand_interaction_ext",
    ]);
    let options = resolve_options(&cli).unwrap();
    assert_eq!(options.graphics_backend, GraphicsBackend::Vulkan);
    assert_eq!(options.form_factor, FormFactor::Handheld);
    assert_eq!(options.random_seed, 77);
    assert_eq!(options.enabled_interaction_profiles.len(), 2);
}

#[test]
fn test_invalid_profile_flag_fails_validation() {
    let cli = Cli::parse_from([
        "conformance-cli",
        "--interaction-profiles",
        "not_a_profile_path",
    ]);
    let error = resolve_options(&cli).unwrap_err();
    assert!(matches!(error, CliError::Config(_)));
}

#[test]
fn test_unknown_backend_value_is_a_parse_error() {
    let result = Cli::try_parse_from(["conformance-cli", "--graphics-plugin", "metal2"]);
    assert!(result.is_err());
}

#[test]
fn test_list_features_flag_parses() {
    let cli = Cli::parse_from(["conformance-cli", "--list-features"]);
    assert!(cli.list_features);
}
