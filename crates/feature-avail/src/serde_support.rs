// feature-avail/src/serde_support.rs
// ============================================================================
// Module: Serde Support
// Description: Name-based serialization for feature sets and availability.
// Purpose: Serialize sets as lists of external feature names, not raw bits.
// Dependencies: crate::{availability, feature, set}, serde
// ============================================================================

//! ## Overview
//! Bit indices are an internal representation detail; on the wire a feature
//! set is the list of its external feature names and an availability is the
//! list of its alternatives. Deserialization rejects unknown names so stale
//! captures fail loudly instead of silently dropping requirements.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as DeError;

use crate::availability::Availability;
use crate::feature::Feature;
use crate::set::FeatureSet;

// ============================================================================
// SECTION: Feature Set Serde
// ============================================================================

impl Serialize for FeatureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names: Vec<&'static str> = self.features().map(Feature::name).collect();
        names.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FeatureSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        let mut set = Self::new();
        for name in &names {
            let feature = Feature::from_name(name)
                .ok_or_else(|| D::Error::custom(format!("unknown feature name: {name}")))?;
            set.insert(feature);
        }
        Ok(set)
    }
}

// ============================================================================
// SECTION: Availability Serde
// ============================================================================

impl Serialize for Availability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let alternatives: Vec<&FeatureSet> = self.iter().collect();
        alternatives.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Availability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let alternatives = Vec::<FeatureSet>::deserialize(deserializer)?;
        Ok(Self::from_alternatives(alternatives))
    }
}
