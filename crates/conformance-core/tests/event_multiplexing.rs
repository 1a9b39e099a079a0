// conformance-core/tests/event_multiplexing.rs
// ============================================================================
// Module: Event Multiplexing Tests
// Description: Tests for the append-only log and independent cursors.
// ============================================================================
//! ## Overview
//! Validates cursor independence, ordering, history isolation, and backlog
//! discarding over a shared event log.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests use unwrap on deterministic fixtures."
)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use conformance_core::EventCursor;
use conformance_core::EventLog;
use conformance_core::EventSource;
use conformance_core::core::EventData;
use conformance_core::core::EventRecord;
use conformance_core::core::RuntimeTime;
use conformance_core::core::SessionHandle;
use conformance_core::core::SessionState;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Poll source fed by the test through a shared queue.
struct QueueSource {
    queue: Arc<Mutex<VecDeque<EventRecord>>>,
}

impl EventSource for QueueSource {
    fn poll_event(&mut self) -> Option<EventRecord> {
        self.queue.lock().unwrap().pop_front()
    }
}

/// Builds a log plus the queue handle that feeds it.
fn queue_log() -> (Arc<EventLog>, Arc<Mutex<VecDeque<EventRecord>>>) {
    let queue = Arc::new(Mutex::new(VecDeque::new()));
    let log = Arc::new(EventLog::new(Box::new(QueueSource {
        queue: Arc::clone(&queue),
    })));
    (log, queue)
}

/// Makes a distinguishable state-change record.
fn state_event(nanos: i64, state: SessionState) -> EventRecord {
    EventRecord::new(
        RuntimeTime::from_nanos(nanos),
        EventData::SessionStateChanged {
            session: SessionHandle::from_raw(7),
            state,
        },
    )
}

/// Pushes records into the poll source.
fn feed(queue: &Arc<Mutex<VecDeque<EventRecord>>>, records: &[EventRecord]) {
    queue.lock().unwrap().extend(records.iter().copied());
}

// ============================================================================
// SECTION: Ordering and History
// ============================================================================

#[test]
fn test_cursor_sees_appends_after_creation_in_order() {
    let (log, queue) = queue_log();
    let mut cursor = EventCursor::new(&log);

    let records = [
        state_event(1, SessionState::Idle),
        state_event(2, SessionState::Ready),
        state_event(3, SessionState::Synchronized),
    ];
    feed(&queue, &records);

    assert_eq!(cursor.try_read_next(), Some(records[0]));
    assert_eq!(cursor.try_read_next(), Some(records[1]));
    assert_eq!(cursor.try_read_next(), Some(records[2]));
    assert_eq!(cursor.try_read_next(), None);
}

#[test]
fn test_late_cursor_never_observes_history() {
    let (log, queue) = queue_log();
    let mut early = EventCursor::new(&log);

    let records = [
        state_event(1, SessionState::Idle),
        state_event(2, SessionState::Ready),
        state_event(3, SessionState::Synchronized),
    ];
    feed(&queue, &records);

    // Early cursor drains the three records into the log.
    assert_eq!(early.try_read_next(), Some(records[0]));

    // A cursor created now starts at the log's current end.
    let mut late = EventCursor::new(&log);
    assert_eq!(late.try_read_next(), None, "no history leakage");

    // Early cursor still walks its remaining records.
    assert_eq!(early.try_read_next(), Some(records[1]));
    assert_eq!(early.try_read_next(), Some(records[2]));

    // New appends are visible to both.
    let fresh = state_event(4, SessionState::Visible);
    feed(&queue, &[fresh]);
    assert_eq!(late.try_read_next(), Some(fresh));
    assert_eq!(early.try_read_next(), Some(fresh));
}

#[test]
fn test_cursors_do_not_affect_each_other() {
    let (log, queue) = queue_log();
    let mut first = EventCursor::new(&log);
    let mut second = EventCursor::new(&log);

    let records = [
        state_event(1, SessionState::Idle),
        state_event(2, SessionState::Ready),
    ];
    feed(&queue, &records);

    // First cursor consumes everything.
    assert_eq!(first.try_read_next(), Some(records[0]));
    assert_eq!(first.try_read_next(), Some(records[1]));
    assert_eq!(first.try_read_next(), None);

    // Second cursor's position is untouched; it replays the same sequence.
    assert_eq!(second.try_read_next(), Some(records[0]));
    assert_eq!(second.try_read_next(), Some(records[1]));
    assert_eq!(second.try_read_next(), None);
}

// ============================================================================
// SECTION: Predicates and Backlog
// ============================================================================

#[test]
fn test_read_until_consumes_intermediates_and_returns_match() {
    let (log, queue) = queue_log();
    let mut cursor = EventCursor::new(&log);

    let records = [
        state_event(1, SessionState::Idle),
        state_event(2, SessionState::Ready),
        state_event(3, SessionState::Focused),
        state_event(4, SessionState::StoppingOrLost),
    ];
    feed(&queue, &records);

    let found = cursor.try_read_until(|record| {
        record.session_state_change(SessionHandle::from_raw(7)) == Some(SessionState::Focused)
    });
    assert_eq!(found, Some(records[2]));

    // The cursor resumes after the match.
    assert_eq!(cursor.try_read_next(), Some(records[3]));
}

#[test]
fn test_read_until_exhaustion_returns_none() {
    let (log, queue) = queue_log();
    let mut cursor = EventCursor::new(&log);
    feed(&queue, &[state_event(1, SessionState::Idle)]);

    let found = cursor.try_read_until(|record| {
        record.session_state_change(SessionHandle::from_raw(7)) == Some(SessionState::Focused)
    });
    assert_eq!(found, None);
    assert_eq!(cursor.try_read_next(), None, "non-matching records were consumed");
}

#[test]
fn test_drain_to_end_discards_backlog_without_reading() {
    let (log, queue) = queue_log();
    let mut cursor = EventCursor::new(&log);

    feed(&queue, &[state_event(1, SessionState::Idle), state_event(2, SessionState::Ready)]);
    cursor.drain_to_end();
    assert_eq!(cursor.try_read_next(), None);

    // Records appended after the discard are delivered normally.
    let fresh = state_event(3, SessionState::Synchronized);
    feed(&queue, &[fresh]);
    assert_eq!(cursor.try_read_next(), Some(fresh));
}

// ============================================================================
// SECTION: Concurrency
// ============================================================================

#[test]
fn test_concurrent_readers_each_see_the_full_suffix() {
    let (log, queue) = queue_log();
    let records: Vec<EventRecord> =
        (0 .. 64).map(|index| state_event(index, SessionState::Visible)).collect();
    feed(&queue, &records);

    let mut handles = Vec::new();
    for _ in 0 .. 4 {
        let mut cursor = EventCursor::new(&log);
        let expected = records.clone();
        handles.push(thread::spawn(move || {
            let mut seen = Vec::new();
            while let Some(record) = cursor.try_read_next() {
                seen.push(record);
            }
            assert_eq!(seen, expected, "every reader sees the same ordered suffix");
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}
