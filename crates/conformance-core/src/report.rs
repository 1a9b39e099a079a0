// conformance-core/src/report.rs
// ============================================================================
// Module: Conformance Report and Harness Context
// Description: Run-wide context object and the conformance report accumulator.
// Purpose: Replace singleton harness state with an explicit, passed context.
// Dependencies: crate::{core, error, interfaces, negotiate, runtime}, rand
// ============================================================================

//! ## Overview
//! Conformance is not a black-and-white result: it is measured against a
//! specification version, a selected set of extensions, and a subset of
//! rendering formats. The report accumulates per-test outcomes, assertion
//! counts, and section nesting, and renders a human-readable summary at the
//! end of a run.
//!
//! The [`HarnessContext`] is constructed once at run start and passed by
//! reference into every component; there is no global state and no implicit
//! lazy initialization, and the context is torn down explicitly at run end.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use feature_avail::FeatureSet;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::ApiVersion;
use crate::core::ProfilePath;
use crate::error::TestFailure;
use crate::interfaces::DeviceRuntime;
use crate::negotiate::runtime_feature_set;
use crate::runtime::Timeouts;

// ============================================================================
// SECTION: Test Outcome
// ============================================================================

/// Final classification of one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum TestOutcome {
    /// Every assertion held.
    Passed,
    /// The test failed.
    Failed,
    /// A required optional capability was absent.
    Skipped,
}

impl TestOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    /// Classifies a test failure into its reported outcome.
    #[must_use]
    pub const fn from_failure(failure: &TestFailure) -> Self {
        if failure.is_skip() { Self::Skipped } else { Self::Failed }
    }
}

// ============================================================================
// SECTION: Conformance Report
// ============================================================================

/// Records and produces a conformance report.
///
/// Test and section boundaries are reported through explicit method calls at
/// well-defined points; section nesting depth drives transcript indentation.
#[derive(Debug)]
pub struct ConformanceReport {
    /// Specification version the run measures against.
    api_version: ApiVersion,
    /// Number of tests that passed.
    passed: usize,
    /// Number of tests that failed.
    failed: usize,
    /// Number of tests skipped on absent capabilities.
    skipped: usize,
    /// Number of assertions that held across the run.
    assertions_passed: usize,
    /// Number of assertions that failed across the run.
    assertions_failed: usize,
    /// Current section nesting depth within the active test.
    section_depth: usize,
    /// Name of the test currently running, if any.
    active_test: Option<String>,
    /// Indented transcript of tests, sections, and failures.
    transcript: Vec<String>,
}

impl ConformanceReport {
    /// Creates an empty report for the given specification version.
    #[must_use]
    pub const fn new(api_version: ApiVersion) -> Self {
        Self {
            api_version,
            passed: 0,
            failed: 0,
            skipped: 0,
            assertions_passed: 0,
            assertions_failed: 0,
            section_depth: 0,
            active_test: None,
            transcript: Vec::new(),
        }
    }

    /// Marks the start of a test.
    pub fn test_begin(&mut self, name: &str) {
        self.active_test = Some(name.to_owned());
        self.section_depth = 0;
        self.transcript.push(format!("test {name}"));
    }

    /// Marks the end of the active test with its outcome.
    pub fn test_end(&mut self, outcome: TestOutcome) {
        match outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed => self.failed += 1,
            TestOutcome::Skipped => self.skipped += 1,
        }
        let name = self.active_test.take().unwrap_or_else(|| "<unnamed>".to_owned());
        self.section_depth = 0;
        self.transcript.push(format!("  {name}: {}", outcome.as_str()));
    }

    /// Marks the start of a nested section within the active test.
    pub fn section_begin(&mut self, name: &str) {
        self.section_depth += 1;
        let indent = "  ".repeat(self.section_depth);
        self.transcript.push(format!("{indent}section {name}"));
    }

    /// Marks the end of the innermost section.
    pub fn section_end(&mut self) {
        self.section_depth = self.section_depth.saturating_sub(1);
    }

    /// Records one assertion result, adding failed assertions to the
    /// transcript attributed to the active test and section.
    pub fn assertion(&mut self, passed: bool, message: &str) {
        if passed {
            self.assertions_passed += 1;
        } else {
            self.assertions_failed += 1;
            let indent = "  ".repeat(self.section_depth + 1);
            self.transcript.push(format!("{indent}FAILED: {message}"));
        }
    }

    /// Records a categorized test failure and closes the active test.
    pub fn record_failure(&mut self, failure: &TestFailure) {
        let outcome = TestOutcome::from_failure(failure);
        if outcome == TestOutcome::Failed {
            let indent = "  ".repeat(self.section_depth + 1);
            self.transcript.push(format!("{indent}FAILED: {failure}"));
        }
        self.test_end(outcome);
    }

    /// Returns the current section nesting depth.
    #[must_use]
    pub const fn section_depth(&self) -> usize {
        self.section_depth
    }

    /// Returns (passed, failed, skipped) test counts.
    #[must_use]
    pub const fn counts(&self) -> (usize, usize, usize) {
        (self.passed, self.failed, self.skipped)
    }

    /// Returns (passed, failed) assertion counts.
    #[must_use]
    pub const fn assertion_counts(&self) -> (usize, usize) {
        (self.assertions_passed, self.assertions_failed)
    }

    /// Generates the human-readable report string.
    ///
    /// Diagnostic text only; nothing parses this back.
    #[must_use]
    pub fn report_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Conformance report for API version {}", self.api_version);
        let _ = writeln!(
            out,
            "Tests: {} passed, {} failed, {} skipped",
            self.passed, self.failed, self.skipped
        );
        let _ = writeln!(
            out,
            "Assertions: {} passed, {} failed",
            self.assertions_passed, self.assertions_failed
        );
        for line in &self.transcript {
            let _ = writeln!(out, "{line}");
        }
        out
    }
}

// ============================================================================
// SECTION: Harness Context
// ============================================================================

/// Run-wide state passed explicitly into every component.
#[derive(Debug)]
pub struct HarnessContext {
    /// Deterministic random engine seeded from the run options.
    pub rand: StdRng,
    /// Report accumulator for the run.
    pub report: ConformanceReport,
    /// Features the runtime could enable: negotiated version plus every
    /// enumerated available extension.
    pub available: FeatureSet,
    /// Features actually enabled on the instance.
    pub enabled: FeatureSet,
    /// Interaction profiles selected for this run.
    pub interaction_profiles: Vec<ProfilePath>,
    /// Bounded-wait policy for the run.
    pub timeouts: Timeouts,
}

impl HarnessContext {
    /// Builds the context from run options and the runtime's enumerated
    /// capabilities.
    pub fn new<R: DeviceRuntime>(
        runtime: &R,
        seed: u64,
        interaction_profiles: Vec<ProfilePath>,
        timeouts: Timeouts,
    ) -> Self {
        let version = runtime.api_version();
        let available = runtime_feature_set(version, &runtime.available_extensions());
        let enabled = runtime_feature_set(version, &runtime.enabled_extensions());
        Self {
            rand: StdRng::seed_from_u64(seed),
            report: ConformanceReport::new(version),
            available,
            enabled,
            interaction_profiles,
            timeouts,
        }
    }
}
