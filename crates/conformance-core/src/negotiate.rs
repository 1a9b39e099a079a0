// conformance-core/src/negotiate.rs
// ============================================================================
// Module: Capability Negotiation Policy
// Description: Folding enumerated capabilities and gating tests on them.
// Purpose: Decide whether a test proceeds and which extensions to request.
// Dependencies: crate::{error, interfaces}, feature-avail
// ============================================================================

//! ## Overview
//! The runtime reports capabilities as stringly-typed extension lists plus a
//! negotiated version. This module folds those into [`FeatureSet`] values and
//! gates tests on them: an unsatisfiable requirement short-circuits as a
//! *skip* before any session or resource exists, because absence of an
//! optional capability is not a defect.

// ============================================================================
// SECTION: Imports
// ============================================================================

use feature_avail::Availability;
use feature_avail::FeatureSet;

use crate::core::ApiVersion;
use crate::error::TestFailure;

// ============================================================================
// SECTION: Capability Folding
// ============================================================================

/// Folds a list of extension name strings into a feature set.
///
/// Unknown names are skipped: runtimes may expose extensions the harness has
/// no feature bit for, and those can never satisfy a requirement anyway.
#[must_use]
pub fn fold_extension_names<S: AsRef<str>>(names: &[S]) -> FeatureSet {
    let mut set = FeatureSet::new();
    for name in names {
        let _ = set.insert_by_name(name.as_ref());
    }
    set
}

/// Builds the full feature set of a runtime: its negotiated version merged
/// with its enumerated extension names.
#[must_use]
pub fn runtime_feature_set<S: AsRef<str>>(version: ApiVersion, extension_names: &[S]) -> FeatureSet {
    FeatureSet::from_version(version.major, version.minor) + fold_extension_names(extension_names)
}

// ============================================================================
// SECTION: Requirement Gating
// ============================================================================

/// Skips the test unless the required features are available, otherwise
/// returns the extension names to enable.
///
/// # Errors
///
/// Returns [`TestFailure::Skipped`] naming `functionality` and the rendered
/// requirement when it is not satisfied by `available`.
pub fn require_features(
    functionality: &str,
    required: &FeatureSet,
    available: &FeatureSet,
) -> Result<Vec<&'static str>, TestFailure> {
    if required.is_satisfied_by(available) {
        Ok(required.extension_names())
    } else {
        Err(TestFailure::skipped(format!("{functionality} via {required}")))
    }
}

/// Skips the test unless some availability alternative is satisfied,
/// otherwise returns the first satisfied alternative's extension names.
///
/// An empty availability is vacuously satisfied and requests no extensions.
///
/// # Errors
///
/// Returns [`TestFailure::Skipped`] naming `functionality` and the rendered
/// availability when no alternative is satisfied by `available`.
pub fn require_any(
    functionality: &str,
    availability: &Availability,
    available: &FeatureSet,
) -> Result<Vec<&'static str>, TestFailure> {
    if availability.is_empty() {
        return Ok(Vec::new());
    }
    availability
        .first_satisfied_by(available)
        .map(FeatureSet::extension_names)
        .ok_or_else(|| TestFailure::skipped(format!("{functionality} via {availability}")))
}
