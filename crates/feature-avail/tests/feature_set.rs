// feature-avail/tests/feature_set.rs
// ============================================================================
// Module: Feature Set Tests
// Description: Tests for feature-set construction, satisfaction, and display.
// ============================================================================
//! ## Overview
//! Integration tests for `FeatureSet` subset semantics, version implication,
//! name lookup, and string rendering.

mod support;

use feature_avail::Feature;
use feature_avail::FeatureSet;
use support::TestResult;
use support::ensure;

/// Checks a condition and returns a test error instead of panicking.
macro_rules! check {
    ($cond:expr $(,)?) => {{
        ensure($cond, concat!("Assertion failed: ", stringify!($cond)))?;
    }};
    ($cond:expr, $($arg:tt)+) => {{
        ensure($cond, format!($($arg)+))?;
    }};
}

/// Checks equality and returns a test error instead of panicking.
macro_rules! check_eq {
    ($left:expr, $right:expr $(,)?) => {{
        let left_val = &$left;
        let right_val = &$right;
        ensure(
            left_val == right_val,
            format!("Expected {left_val:?} == {right_val:?}"),
        )?;
    }};
}

// ============================================================================
// SECTION: Construction
// ============================================================================

#[test]
fn test_empty_set_contains_nothing() -> TestResult {
    let set = FeatureSet::new();
    check!(set.is_empty());
    check_eq!(set.count(), 0);
    for feature in Feature::ALL {
        check!(!set.contains(feature), "empty set should not contain {feature}");
    }
    Ok(())
}

#[test]
fn test_version_construction_implies_earlier_versions() -> TestResult {
    let v1_0 = FeatureSet::from_version(1, 0);
    check!(v1_0.contains(Feature::Version1_0));
    check!(!v1_0.contains(Feature::Version1_1));

    let v1_1 = FeatureSet::from_version(1, 1);
    check!(v1_1.contains(Feature::Version1_0), "1.1 implies 1.0");
    check!(v1_1.contains(Feature::Version1_1));
    check!(!v1_1.contains(Feature::LoaderVersion1_0), "loader version is not a core version");
    Ok(())
}

#[test]
fn test_unknown_major_version_sets_no_bits() -> TestResult {
    let set = FeatureSet::from_version(2, 0);
    check!(set.is_empty());
    Ok(())
}

#[test]
fn test_from_features_sets_exactly_the_given_bits() -> TestResult {
    let set = FeatureSet::from_features(&[Feature::Version1_0, Feature::KhrOpenglEnable]);
    check_eq!(set.count(), 2);
    check!(set.contains(Feature::Version1_0));
    check!(set.contains(Feature::KhrOpenglEnable));
    Ok(())
}

// ============================================================================
// SECTION: Satisfaction
// ============================================================================

#[test]
fn test_satisfaction_is_reflexive() -> TestResult {
    for feature in Feature::ALL {
        let set = FeatureSet::from_features(&[feature]);
        check!(set.is_satisfied_by(&set), "{feature} should satisfy itself");
    }
    let everything: FeatureSet = Feature::ALL.into_iter().collect();
    check!(everything.is_satisfied_by(&everything));
    Ok(())
}

#[test]
fn test_subset_is_satisfied_superset_is_not() -> TestResult {
    let subset = FeatureSet::from_features(&[Feature::Version1_0]);
    let superset = FeatureSet::from_features(&[Feature::Version1_0, Feature::ExtHandTracking]);

    check!(subset.is_satisfied_by(&superset));
    check!(!superset.is_satisfied_by(&subset), "missing bit must fail the subset test");
    Ok(())
}

#[test]
fn test_empty_set_is_satisfied_by_anything() -> TestResult {
    let empty = FeatureSet::new();
    check!(empty.is_satisfied_by(&empty));
    check!(empty.is_satisfied_by(&FeatureSet::from_version(1, 1)));
    Ok(())
}

#[test]
fn test_union_merges_bits() -> TestResult {
    let version = FeatureSet::from_version(1, 0);
    let extensions = FeatureSet::from_features(&[Feature::KhrVulkanEnable2]);
    let merged = version + extensions;

    check!(version.is_satisfied_by(&merged));
    check!(extensions.is_satisfied_by(&merged));
    check_eq!(merged.count(), 2);

    let mut accumulated = FeatureSet::new();
    accumulated += version;
    accumulated += extensions;
    check_eq!(accumulated, merged);
    Ok(())
}

#[test]
fn test_versions_only_strips_extensions() -> TestResult {
    let mixed = FeatureSet::from_features(&[Feature::Version1_0, Feature::KhrOpenglEnable]);
    check_eq!(mixed.versions_only(), FeatureSet::from_features(&[Feature::Version1_0]));
    Ok(())
}

// ============================================================================
// SECTION: Name Lookup
// ============================================================================

#[test]
fn test_name_round_trips_through_lookup() -> TestResult {
    for feature in Feature::ALL {
        check_eq!(Feature::from_name(feature.name()), Some(feature));
    }
    Ok(())
}

#[test]
fn test_unknown_name_is_none_not_a_sentinel_value() -> TestResult {
    check_eq!(Feature::from_name("XR_FAKE_not_an_extension"), None);
    Ok(())
}

#[test]
fn test_insert_by_name_reports_recognition() -> TestResult {
    let mut set = FeatureSet::new();
    check!(set.insert_by_name("XR_EXT_hand_tracking"));
    check!(set.contains(Feature::ExtHandTracking));
    check!(!set.insert_by_name("XR_FAKE_not_an_extension"));
    check_eq!(set.count(), 1);
    Ok(())
}

#[test]
fn test_extension_names_exclude_versions() -> TestResult {
    let set = FeatureSet::from_features(&[
        Feature::Version1_0,
        Feature::LoaderVersion1_0,
        Feature::KhrOpenglEnable,
    ]);
    check_eq!(set.extension_names(), vec!["XR_KHR_opengl_enable"]);
    Ok(())
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

#[test]
fn test_display_single_feature() -> TestResult {
    let set = FeatureSet::from_features(&[Feature::Version1_0]);
    check_eq!(set.to_string(), "XR_VERSION_1_0");
    Ok(())
}

#[test]
fn test_display_joins_features_with_plus() -> TestResult {
    let set = FeatureSet::from_features(&[Feature::Version1_0, Feature::KhrOpenglEnable]);
    check_eq!(set.to_string(), "XR_VERSION_1_0+XR_KHR_opengl_enable");
    Ok(())
}

#[test]
fn test_display_empty_set_is_empty_string() -> TestResult {
    check_eq!(FeatureSet::new().to_string(), "");
    Ok(())
}

// ============================================================================
// SECTION: Serde
// ============================================================================

#[test]
fn test_feature_set_serializes_as_names() -> TestResult {
    let set = FeatureSet::from_features(&[Feature::Version1_0, Feature::ExtDebugUtils]);
    let json = serde_json::to_string(&set)?;
    check_eq!(json, r#"["XR_VERSION_1_0","XR_EXT_debug_utils"]"#);

    let restored: FeatureSet = serde_json::from_str(&json)?;
    check_eq!(restored, set);
    Ok(())
}

#[test]
fn test_feature_set_rejects_unknown_names() -> TestResult {
    let result: Result<FeatureSet, _> = serde_json::from_str(r#"["XR_FAKE_not_an_extension"]"#);
    check!(result.is_err(), "unknown names must fail deserialization");
    Ok(())
}
