// feature-avail/src/set.rs
// ============================================================================
// Module: Feature Set
// Description: Fixed-width bit vector over the feature enumeration.
// Purpose: Define `FeatureSet` with union, subset satisfaction, and rendering.
// Dependencies: crate::feature
// ============================================================================

//! ## Overview
//! A `FeatureSet` is a conjunction: every set bit must hold. Considered as a
//! requirement it is satisfied by an available set exactly when it is a subset
//! of that set. Sets are immutable after construction apart from the explicit
//! `insert` accessors used while folding enumerated capability lists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::ops::Add;
use std::ops::AddAssign;

use crate::feature::Feature;

// ============================================================================
// SECTION: Feature Set Definition
// ============================================================================

/// A set of features (core versions and extensions).
///
/// Can be used to reflect the set of enabled extensions, or as one way to
/// satisfy the feature requirements of some entity.
///
/// The backing word is sized for [`Feature::COUNT`]; the width is fixed at
/// build time and checked by a unit test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FeatureSet {
    /// Bit vector indexed by [`Feature::bit_index`].
    bits: u64,
}

/// Mask covering the version features, used by [`FeatureSet::versions_only`].
const VERSION_MASK: u64 = (1_u64 << Feature::Version1_0 as u16)
    | (1_u64 << Feature::LoaderVersion1_0 as u16)
    | (1_u64 << Feature::Version1_1 as u16);

impl FeatureSet {
    /// Creates an empty feature set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bits: 0,
        }
    }

    /// Creates a feature set from a core specification version.
    ///
    /// Requesting a version implies every earlier core version and no forward
    /// bits: 1.1 sets both the 1.0 and 1.1 version bits.
    #[must_use]
    pub fn from_version(major: u16, minor: u16) -> Self {
        let mut set = Self::new();
        if major == 1 {
            set.insert(Feature::Version1_0);
            if minor >= 1 {
                set.insert(Feature::Version1_1);
            }
        }
        set
    }

    /// Creates a feature set containing exactly the given features.
    #[must_use]
    pub fn from_features(features: &[Feature]) -> Self {
        let mut set = Self::new();
        for feature in features {
            set.insert(*feature);
        }
        set
    }

    /// Extracts only the version features from a feature set.
    #[must_use]
    pub const fn versions_only(&self) -> Self {
        Self {
            bits: self.bits & VERSION_MASK,
        }
    }

    /// Sets the bit for a feature.
    pub const fn insert(&mut self, feature: Feature) {
        self.bits |= 1 << feature.bit_index();
    }

    /// Sets the bit for a feature by its external string name.
    ///
    /// Returns true when the name was recognized.
    pub fn insert_by_name(&mut self, name: &str) -> bool {
        match Feature::from_name(name) {
            Some(feature) => {
                self.insert(feature);
                true
            }
            None => false,
        }
    }

    /// Returns true when the feature's bit is set.
    #[must_use]
    pub const fn contains(&self, feature: Feature) -> bool {
        self.bits & (1 << feature.bit_index()) != 0
    }

    /// Returns the union of this set and another.
    #[must_use]
    pub const fn union(&self, other: &Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Returns true if this feature set, considered as requirements, is
    /// satisfied by the given available features.
    ///
    /// That is, returns true if this set is a subset of (or equal to)
    /// `available`. This is the single evaluation primitive of the crate.
    #[must_use]
    pub const fn is_satisfied_by(&self, available: &Self) -> bool {
        self.bits & available.bits == self.bits
    }

    /// Returns the number of features enabled.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns true when no feature is enabled.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterates over the enabled features in bit-index order.
    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.into_iter().filter(|feature| self.contains(*feature))
    }

    /// Returns the enabled extension names, excluding version features.
    ///
    /// These are the names a caller passes to instance creation when this set
    /// is the chosen availability alternative.
    #[must_use]
    pub fn extension_names(&self) -> Vec<&'static str> {
        self.features()
            .filter(|feature| !feature.is_version())
            .map(Feature::name)
            .collect()
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut set = Self::new();
        for feature in iter {
            set.insert(feature);
        }
        set
    }
}

impl Add for FeatureSet {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        self.union(&other)
    }
}

impl AddAssign for FeatureSet {
    fn add_assign(&mut self, other: Self) {
        *self = self.union(&other);
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Separator between feature names when rendering a feature set.
const FEATURE_SET_TERM_JOINER: &str = "+";

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for feature in self.features() {
            if !first {
                f.write_str(FEATURE_SET_TERM_JOINER)?;
            }
            f.write_str(feature.name())?;
            first = false;
        }
        Ok(())
    }
}
