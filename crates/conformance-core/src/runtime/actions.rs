// conformance-core/src/runtime/actions.rs
// ============================================================================
// Module: Action Binding
// Description: Ordered accumulation and atomic attachment of input bindings.
// Purpose: Preserve binding suggestion order and freeze bindings at attach.
// Dependencies: crate::{core, error, interfaces}, smallvec
// ============================================================================

//! ## Overview
//! The binder accumulates suggested bindings per interaction profile in
//! first-seen profile order, with each profile's bindings kept in call order.
//! Some runtimes use last-write-wins or first-match semantics, so tests must
//! be able to rely on suggestion order deterministically. At attach time each
//! profile's accumulated list is submitted as one atomic suggestion, then the
//! action sets are frozen against the session; any mutation afterwards is an
//! internal harness error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use smallvec::SmallVec;

use crate::core::ActionBinding;
use crate::core::ActionSetHandle;
use crate::core::ProfilePath;
use crate::core::SessionHandle;
use crate::error::HarnessResult;
use crate::error::TestFailure;
use crate::interfaces::DeviceRuntime;

// ============================================================================
// SECTION: Profile Buckets
// ============================================================================

/// Accumulated bindings for one interaction profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileBindings {
    /// The interaction profile the bindings target.
    pub profile: ProfilePath,
    /// Bindings in the order the caller suggested them.
    pub bindings: SmallVec<[ActionBinding; 4]>,
}

// ============================================================================
// SECTION: Action Binder
// ============================================================================

/// Accumulates action sets and per-profile bindings, then attaches them to a
/// session exactly once.
#[derive(Debug, Default)]
pub struct ActionBinder {
    /// Action sets to attach, in registration order.
    action_sets: Vec<ActionSetHandle>,
    /// Per-profile buckets in first-seen profile order.
    profiles: Vec<ProfileBindings>,
    /// Set once the bindings are frozen against a session.
    attached: bool,
}

impl ActionBinder {
    /// Creates an empty binder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            action_sets: Vec::new(),
            profiles: Vec::new(),
            attached: false,
        }
    }

    /// Registers an action set for attachment.
    ///
    /// # Errors
    ///
    /// Returns [`TestFailure::Internal`] when the sets are already frozen.
    pub fn add_action_set(&mut self, set: ActionSetHandle) -> HarnessResult {
        self.ensure_not_attached("add an action set")?;
        self.action_sets.push(set);
        Ok(())
    }

    /// Accumulates bindings for an interaction profile.
    ///
    /// A profile keeps its position from the first call that mentioned it;
    /// later calls append to that profile's bucket in call order.
    ///
    /// # Errors
    ///
    /// Returns [`TestFailure::Internal`] when the sets are already frozen.
    pub fn add_bindings(
        &mut self,
        profile: ProfilePath,
        bindings: impl IntoIterator<Item = ActionBinding>,
    ) -> HarnessResult {
        self.ensure_not_attached("suggest bindings")?;
        let existing = self.profiles.iter().position(|bucket| bucket.profile == profile);
        match existing {
            Some(index) => {
                if let Some(bucket) = self.profiles.get_mut(index) {
                    bucket.bindings.extend(bindings);
                }
            }
            None => self.profiles.push(ProfileBindings {
                profile,
                bindings: bindings.into_iter().collect(),
            }),
        }
        Ok(())
    }

    /// Submits each profile's bindings as one atomic suggestion in first-seen
    /// profile order, then attaches the action sets and freezes this binder.
    ///
    /// # Errors
    ///
    /// Propagates the runtime's rejection of any suggestion or of the
    /// attachment; returns [`TestFailure::Internal`] on re-attachment.
    pub fn attach<R: DeviceRuntime>(
        &mut self,
        runtime: &mut R,
        session: SessionHandle,
    ) -> HarnessResult {
        if self.attached {
            return Err(TestFailure::internal(
                "action sets are already attached; bindings are frozen",
            ));
        }
        for bucket in &self.profiles {
            runtime.suggest_bindings(&bucket.profile, &bucket.bindings)?;
        }
        runtime.attach_action_sets(session, &self.action_sets)?;
        self.attached = true;
        Ok(())
    }

    /// Synchronizes action state for the attached sets.
    ///
    /// # Errors
    ///
    /// Returns [`TestFailure::Internal`] before attachment, and propagates
    /// runtime failures.
    pub fn sync<R: DeviceRuntime>(
        &mut self,
        runtime: &mut R,
        session: SessionHandle,
    ) -> HarnessResult {
        if !self.attached {
            return Err(TestFailure::internal("cannot sync actions before attachment"));
        }
        runtime.sync_actions(session, &self.action_sets)?;
        Ok(())
    }

    /// Returns true once the bindings are frozen.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Returns the registered action sets in registration order.
    #[must_use]
    pub fn action_sets(&self) -> &[ActionSetHandle] {
        &self.action_sets
    }

    /// Returns the per-profile buckets in first-seen profile order.
    #[must_use]
    pub fn profiles(&self) -> &[ProfileBindings] {
        &self.profiles
    }

    /// Rejects mutation after the freeze point.
    fn ensure_not_attached(&self, operation: &str) -> HarnessResult {
        if self.attached {
            return Err(TestFailure::internal(format!(
                "cannot {operation} after action sets were attached"
            )));
        }
        Ok(())
    }
}
