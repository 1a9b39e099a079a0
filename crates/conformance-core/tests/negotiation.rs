// conformance-core/tests/negotiation.rs
// ============================================================================
// Module: Capability Negotiation Tests
// Description: Tests for capability folding and test gating.
// ============================================================================
//! ## Overview
//! Validates that enumerated extension lists fold into feature sets, that
//! unsatisfied requirements skip (not fail) before any resource exists, and
//! that availability alternatives select their extension lists in order.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap on deterministic fixtures."
)]

use conformance_core::TestFailure;
use conformance_core::core::ApiVersion;
use conformance_core::fold_extension_names;
use conformance_core::require_any;
use conformance_core::require_features;
use conformance_core::runtime_feature_set;
use feature_avail::Availability;
use feature_avail::Feature;
use feature_avail::FeatureSet;

// ============================================================================
// SECTION: Folding
// ============================================================================

#[test]
fn test_fold_ignores_unknown_names() {
    let folded = fold_extension_names(&[
        "XR_KHR_opengl_enable",
        "XR_VENDORX_private_extension",
        "XR_EXT_hand_tracking",
    ]);
    assert_eq!(
        folded,
        FeatureSet::from_features(&[Feature::KhrOpenglEnable, Feature::ExtHandTracking])
    );
}

#[test]
fn test_runtime_feature_set_merges_version_and_extensions() {
    let set = runtime_feature_set(ApiVersion::V1_1, &["XR_KHR_vulkan_enable2".to_owned()]);
    assert!(set.contains(Feature::Version1_0), "1.1 implies 1.0");
    assert!(set.contains(Feature::Version1_1));
    assert!(set.contains(Feature::KhrVulkanEnable2));
    assert_eq!(set.count(), 3);
}

// ============================================================================
// SECTION: Requirement Gating
// ============================================================================

#[test]
fn test_satisfied_requirement_returns_extensions_to_enable() {
    let available = runtime_feature_set(ApiVersion::V1_0, &["XR_EXT_hand_tracking".to_owned()]);
    let required = FeatureSet::from_features(&[Feature::Version1_0, Feature::ExtHandTracking]);

    let extensions = require_features("hand tracking", &required, &available).unwrap();
    assert_eq!(extensions, vec!["XR_EXT_hand_tracking"]);
}

#[test]
fn test_unsatisfied_requirement_skips_with_rendered_requirement() {
    let available = runtime_feature_set::<String>(ApiVersion::V1_0, &[]);
    let required = FeatureSet::from_features(&[Feature::Version1_0, Feature::ExtHandTracking]);

    let failure = require_features("hand tracking", &required, &available).unwrap_err();
    assert!(failure.is_skip(), "missing optional capability skips, never fails");
    let message = failure.to_string();
    assert!(message.contains("hand tracking"), "skip names the functionality: {message}");
    assert!(
        message.contains("XR_VERSION_1_0+XR_EXT_hand_tracking"),
        "skip renders the requirement: {message}"
    );
}

#[test]
fn test_empty_availability_always_proceeds() {
    let available = runtime_feature_set::<String>(ApiVersion::V1_0, &[]);
    let extensions = require_any("anything", &Availability::new(), &available).unwrap();
    assert!(extensions.is_empty());
}

#[test]
fn test_first_satisfied_alternative_wins() {
    let availability = Availability::from_alternatives(vec![
        FeatureSet::from_features(&[Feature::KhrD3d11Enable]),
        FeatureSet::from_features(&[Feature::KhrVulkanEnable2]),
    ]);
    let available =
        runtime_feature_set(ApiVersion::V1_0, &["XR_KHR_vulkan_enable2".to_owned()]);

    let extensions = require_any("graphics binding", &availability, &available).unwrap();
    assert_eq!(extensions, vec!["XR_KHR_vulkan_enable2"]);
}

#[test]
fn test_no_alternative_satisfied_skips() {
    let availability = Availability::from_alternatives(vec![FeatureSet::from_features(&[
        Feature::KhrD3d11Enable,
    ])]);
    let available = runtime_feature_set::<String>(ApiVersion::V1_0, &[]);

    let failure = require_any("graphics binding", &availability, &available).unwrap_err();
    assert!(matches!(failure, TestFailure::Skipped { .. }));
}
