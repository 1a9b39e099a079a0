// conformance-core/src/core/event.rs
// ============================================================================
// Module: Event Records
// Description: The tagged union of events emitted by the runtime.
// Purpose: Model the fixed-shape event buffer appended to the event log.
// Dependencies: crate::core::{identifiers, time, types}, serde
// ============================================================================

//! ## Overview
//! Events are produced only by draining the runtime's poll primitive and are
//! never mutated once appended to the log. Session lifecycle transitions are
//! observed exclusively through `SessionStateChanged` records; the
//! orchestrator must not infer state any other way.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::SessionHandle;
use crate::core::time::RuntimeTime;
use crate::core::types::ReferenceSpaceType;
use crate::core::types::SessionState;

// ============================================================================
// SECTION: Event Data
// ============================================================================

/// The tagged union carried by one event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EventData {
    /// The session moved to a new lifecycle state.
    SessionStateChanged {
        /// Session whose state changed.
        session: SessionHandle,
        /// The state entered.
        state: SessionState,
    },
    /// The active interaction profile changed for the session.
    InteractionProfileChanged {
        /// Session whose profile changed.
        session: SessionHandle,
    },
    /// A reference space is about to change its origin.
    ReferenceSpaceChangePending {
        /// Session owning the space.
        session: SessionHandle,
        /// Kind of reference space changing.
        space_type: ReferenceSpaceType,
    },
    /// The runtime dropped events before they could be polled.
    EventsLost {
        /// Number of events lost.
        count: u32,
    },
    /// The runtime instance is about to become unusable.
    InstanceLossPending {
        /// Time at which the instance will be lost.
        loss_time: RuntimeTime,
    },
}

// ============================================================================
// SECTION: Event Record
// ============================================================================

/// One immutable event drained from the runtime poll source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Time the runtime emitted the event.
    pub time: RuntimeTime,
    /// Event payload.
    pub data: EventData,
}

impl EventRecord {
    /// Creates an event record.
    #[must_use]
    pub const fn new(time: RuntimeTime, data: EventData) -> Self {
        Self {
            time,
            data,
        }
    }

    /// Returns the new session state when this record is a state change for
    /// the given session.
    #[must_use]
    pub fn session_state_change(&self, session: SessionHandle) -> Option<SessionState> {
        match self.data {
            EventData::SessionStateChanged {
                session: changed,
                state,
            } if changed == session => Some(state),
            _ => None,
        }
    }
}
