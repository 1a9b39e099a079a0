// feature-avail/src/availability.rs
// ============================================================================
// Module: Availability
// Description: Disjunction of feature-set conjunctions.
// Purpose: Define `Availability` and its vacuous-satisfaction policy.
// Dependencies: crate::set, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! Availability is expressed in disjunctive normal form: an OR of ANDs. It
//! holds an ordered collection of [`FeatureSet`] alternatives, one of which
//! must be satisfied. An empty availability is trivially satisfied; the
//! absence of a declared requirement means "no extra requirement".

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use smallvec::SmallVec;

use crate::set::FeatureSet;

// ============================================================================
// SECTION: Availability Definition
// ============================================================================

/// Separator between alternatives when rendering an availability.
const AVAILABILITY_TERM_JOINER: &str = ",";

/// Information on when an entity is available.
///
/// Since all availability should be statically known, objects of this type
/// cannot be modified after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
    /// Ordered alternatives; the first satisfied one is the one callers use.
    alternatives: SmallVec<[FeatureSet; 2]>,
}

impl Availability {
    /// Creates an empty availability: always satisfied. Usually not what you
    /// want.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            alternatives: SmallVec::new_const(),
        }
    }

    /// Creates an availability from a single feature set.
    #[must_use]
    pub fn from_feature_set(features: FeatureSet) -> Self {
        Self {
            alternatives: SmallVec::from_slice(&[features]),
        }
    }

    /// Creates an availability from an ordered list of alternatives.
    #[must_use]
    pub fn from_alternatives(alternatives: Vec<FeatureSet>) -> Self {
        Self {
            alternatives: SmallVec::from_vec(alternatives),
        }
    }

    /// Returns true if some alternative is satisfied by the given available
    /// features. Always returns true (trivially) if empty.
    #[must_use]
    pub fn is_satisfied_by(&self, available: &FeatureSet) -> bool {
        if self.alternatives.is_empty() {
            // Trivially satisfied, anything goes.
            return true;
        }
        self.alternatives.iter().any(|alternative| alternative.is_satisfied_by(available))
    }

    /// Returns the first alternative satisfied by the given available
    /// features, if any.
    ///
    /// Callers request the returned alternative's extension names when
    /// creating an instance.
    #[must_use]
    pub fn first_satisfied_by(&self, available: &FeatureSet) -> Option<&FeatureSet> {
        self.alternatives.iter().find(|alternative| alternative.is_satisfied_by(available))
    }

    /// Iterates the alternatives in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, FeatureSet> {
        self.alternatives.iter()
    }

    /// Returns the number of alternatives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// Returns true when there are no alternatives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

impl From<FeatureSet> for Availability {
    fn from(features: FeatureSet) -> Self {
        Self::from_feature_set(features)
    }
}

impl FromIterator<FeatureSet> for Availability {
    fn from_iter<I: IntoIterator<Item = FeatureSet>>(iter: I) -> Self {
        Self {
            alternatives: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Availability {
    type IntoIter = std::slice::Iter<'a, FeatureSet>;
    type Item = &'a FeatureSet;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for alternative in &self.alternatives {
            if !first {
                f.write_str(AVAILABILITY_TERM_JOINER)?;
            }
            write!(f, "{alternative}")?;
            first = false;
        }
        Ok(())
    }
}
