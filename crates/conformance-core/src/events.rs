// conformance-core/src/events.rs
// ============================================================================
// Module: Event Multiplexing
// Description: Append-only event log with independent read cursors.
// Purpose: Fan one polled event stream out to many uncoordinated consumers.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! One physical poll loop drains the runtime; every consumer tails the same
//! ordered log through its own cursor. A cursor captures the log length at
//! creation (it never sees earlier history), never re-returns a record, and is
//! wholly unaffected by other cursors' positions. Redundant concurrent drains
//! are harmless: each drain appends under the log lock, so a drain that loses
//! the race simply appends nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::EventRecord;
use crate::interfaces::EventSource;

// ============================================================================
// SECTION: Event Log
// ============================================================================

/// Log state guarded by the single append/read lock.
struct LogInner {
    /// The runtime's poll primitive.
    source: Box<dyn EventSource + Send>,
    /// Every record drained so far, in poll order.
    records: Vec<EventRecord>,
}

/// The single ordered, append-only buffer of events for one runtime instance.
///
/// Only accessible through [`EventCursor`] reads or [`EventLog::drain`]. The
/// log lives as long as the instance binding it was created with.
pub struct EventLog {
    /// Records plus the poll source, mutated only under this lock.
    inner: Mutex<LogInner>,
}

impl EventLog {
    /// Creates a log draining the given poll source.
    #[must_use]
    pub fn new(source: Box<dyn EventSource + Send>) -> Self {
        Self {
            inner: Mutex::new(LogInner {
                source,
                records: Vec::new(),
            }),
        }
    }

    /// Locks the log state, recovering from poisoning.
    ///
    /// A poisoned lock means a panicking thread was interrupted mid-access;
    /// the vector itself is still structurally valid, and the harness treats
    /// the records appended so far as authoritative.
    fn lock(&self) -> MutexGuard<'_, LogInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Drains the poll source until it reports no more events, appending each
    /// returned record to the tail of the log in poll order.
    ///
    /// Safe to call from multiple cursors at once; all drains funnel through
    /// the same lock and a redundant drain appends nothing.
    pub fn drain(&self) {
        let mut inner = self.lock();
        while let Some(record) = inner.source.poll_event() {
            inner.records.push(record);
        }
    }

    /// Returns the number of records appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Returns true when no record has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the record at an absolute log index, if appended.
    fn record_at(&self, index: usize) -> Option<EventRecord> {
        self.lock().records.get(index).copied()
    }
}

// ============================================================================
// SECTION: Event Cursor
// ============================================================================

/// Reads all events added to an [`EventLog`] after this cursor was created.
///
/// Separate cursors over the same log do not impact each other, which lets
/// different parts of a test read events independently.
pub struct EventCursor {
    /// The shared log this cursor tails.
    log: Arc<EventLog>,
    /// Next unread absolute index, private to this cursor.
    next: usize,
}

impl EventCursor {
    /// Creates a cursor starting at the log's current end.
    ///
    /// History appended before creation is never observed.
    #[must_use]
    pub fn new(log: &Arc<EventLog>) -> Self {
        Self {
            log: Arc::clone(log),
            next: log.len(),
        }
    }

    /// Drains the poll source, then returns the next unread record if one is
    /// available, advancing this cursor past it.
    pub fn try_read_next(&mut self) -> Option<EventRecord> {
        self.log.drain();
        let record = self.log.record_at(self.next)?;
        self.next += 1;
        Some(record)
    }

    /// Reads records until one satisfies the predicate or the log is
    /// exhausted; intermediate records are consumed.
    pub fn try_read_until(
        &mut self,
        mut predicate: impl FnMut(&EventRecord) -> bool,
    ) -> Option<EventRecord> {
        while let Some(record) = self.try_read_next() {
            if predicate(&record) {
                return Some(record);
            }
        }
        None
    }

    /// Advances past every record currently in the log without returning any,
    /// discarding the backlog.
    pub fn drain_to_end(&mut self) {
        self.log.drain();
        self.next = self.log.len();
    }

    /// Returns this cursor's next unread absolute index.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.next
    }
}
