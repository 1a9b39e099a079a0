// conformance-core/src/core/time.rs
// ============================================================================
// Module: Runtime Time
// Description: The runtime's opaque nanosecond timestamp.
// Purpose: Provide a typed wrapper so display times and poses stay consistent.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The runtime reports time as a signed nanosecond count on its own monotonic
//! clock. The harness records the most recent predicted display time and
//! reuses it for space/pose queries inside the same logical frame rather than
//! re-querying, so every query in a frame observes one consistent timestamp.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Runtime Time
// ============================================================================

/// A timestamp on the runtime's monotonic clock, in nanoseconds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct RuntimeTime(i64);

impl RuntimeTime {
    /// Creates a timestamp from a raw nanosecond count.
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Returns the raw nanosecond count.
    #[must_use]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Returns this timestamp advanced by a duration, saturating at the clock
    /// maximum.
    #[must_use]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let nanos = i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(nanos))
    }
}

impl fmt::Display for RuntimeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}
