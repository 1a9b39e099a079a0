// conformance-core/src/error.rs
// ============================================================================
// Module: Harness Error Taxonomy
// Description: Typed failure categories for a running conformance test.
// Purpose: Classify skip/protocol/timeout/assertion/internal outcomes.
// Dependencies: crate::interfaces, thiserror
// ============================================================================

//! ## Overview
//! Every failure a test can hit falls into one category: a *skip* (an
//! unsatisfiable optional capability, detected before any resource exists), a
//! *protocol* error (a result code outside the allowed set, never retried), a
//! *timeout* (a bounded poll loop expired), an *assertion* (a test-level
//! verdict), or an *internal* harness error (a logic violation inside the
//! orchestrator). Errors unwind through ownership-scoped cleanup and surface
//! as a single failed test; the run continues with the next test.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

use crate::interfaces::RenderError;
use crate::interfaces::RuntimeError;

// ============================================================================
// SECTION: Test Failure
// ============================================================================

/// Result alias used across the harness.
pub type HarnessResult<T = ()> = Result<T, TestFailure>;

/// A categorized failure of the current test.
#[derive(Debug, Error)]
pub enum TestFailure {
    /// An optional capability requirement is unsatisfiable. Absence of an
    /// optional capability is not a defect; the test is skipped, not failed.
    #[error("skipped: requires {requirement}")]
    Skipped {
        /// Rendering of the unsatisfied requirement.
        requirement: String,
    },
    /// The runtime returned a result code outside the documented allowed set.
    #[error(transparent)]
    Protocol(#[from] RuntimeError),
    /// The rendering collaborator failed or stalled.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// A bounded poll loop exceeded its deadline.
    #[error("timed out after {}ms waiting for {operation}", waited.as_millis())]
    Timeout {
        /// What the loop was waiting for.
        operation: String,
        /// How long the loop waited before giving up.
        waited: Duration,
    },
    /// A test-level check or verdict failed.
    #[error("assertion failed: {message}")]
    Assertion {
        /// Human-readable failure description.
        message: String,
    },
    /// A logic violation inside the harness itself. Always hard and
    /// unrecoverable for the current test.
    #[error("internal harness error: {message}")]
    Internal {
        /// Description of the violated invariant.
        message: String,
    },
}

impl TestFailure {
    /// Creates a skip failure from a displayable requirement.
    #[must_use]
    pub fn skipped(requirement: impl Into<String>) -> Self {
        Self::Skipped {
            requirement: requirement.into(),
        }
    }

    /// Creates an assertion failure.
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    /// Creates an internal harness failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates a timeout failure.
    #[must_use]
    pub fn timeout(operation: impl Into<String>, waited: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            waited,
        }
    }

    /// Returns true when this failure means "skip", not "fail".
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}
