// conformance-core/tests/proptest_cursors.rs
// ============================================================================
// Module: Event Cursor Property-Based Tests
// Description: Property tests for the cursor suffix invariant.
// ============================================================================
//! Property-based tests for event multiplexing: every cursor returns exactly
//! the suffix of the log starting at its creation point, in append order,
//! regardless of how reads interleave with appends and other cursors.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use conformance_core::EventCursor;
use conformance_core::EventLog;
use conformance_core::EventSource;
use conformance_core::core::EventData;
use conformance_core::core::EventRecord;
use conformance_core::core::RuntimeTime;
use proptest::prelude::*;

/// Poll source fed by the test through a shared queue.
struct QueueSource {
    queue: Arc<Mutex<VecDeque<EventRecord>>>,
}

impl EventSource for QueueSource {
    fn poll_event(&mut self) -> Option<EventRecord> {
        self.queue.lock().unwrap().pop_front()
    }
}

/// One scripted step of the interleaving.
#[derive(Debug, Clone, Copy)]
enum Step {
    /// Append the next numbered record to the poll source.
    Append,
    /// Read once from cursor A.
    ReadA,
    /// Read once from cursor B.
    ReadB,
    /// Create cursor B at the current position (first occurrence only).
    SpawnB,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => Just(Step::Append),
        2 => Just(Step::ReadA),
        2 => Just(Step::ReadB),
        1 => Just(Step::SpawnB),
    ]
}

/// Numbers a record so order is observable.
fn numbered(sequence: u32) -> EventRecord {
    EventRecord::new(
        RuntimeTime::from_nanos(i64::from(sequence)),
        EventData::EventsLost {
            count: sequence,
        },
    )
}

proptest! {
    #[test]
    fn cursors_see_their_suffix_in_order(steps in prop::collection::vec(step_strategy(), 0 .. 64)) {
        let queue = Arc::new(Mutex::new(VecDeque::new()));
        let log = Arc::new(EventLog::new(Box::new(QueueSource { queue: Arc::clone(&queue) })));

        let mut cursor_a = EventCursor::new(&log);
        let mut cursor_b: Option<EventCursor> = None;

        let mut appended: u32 = 0;
        let mut b_start: u32 = 0;
        let mut seen_a = Vec::new();
        let mut seen_b = Vec::new();

        for step in steps {
            match step {
                Step::Append => {
                    queue.lock().unwrap().push_back(numbered(appended));
                    appended += 1;
                }
                Step::ReadA => {
                    if let Some(record) = cursor_a.try_read_next() {
                        seen_a.push(record);
                    }
                }
                Step::ReadB => {
                    if let Some(cursor) = cursor_b.as_mut()
                        && let Some(record) = cursor.try_read_next()
                    {
                        seen_b.push(record);
                    }
                }
                Step::SpawnB => {
                    if cursor_b.is_none() {
                        // B starts at whatever has been drained into the log,
                        // not at what was merely queued at the source.
                        b_start = u32::try_from(log.len()).unwrap();
                        cursor_b = Some(EventCursor::new(&log));
                    }
                }
            }
        }

        // Cursor A saw a prefix of the numbered sequence from zero.
        for (position, record) in seen_a.iter().enumerate() {
            prop_assert_eq!(*record, numbered(u32::try_from(position).unwrap()));
        }

        // Cursor B saw a contiguous run starting at its creation point.
        for (offset, record) in seen_b.iter().enumerate() {
            let expected = b_start + u32::try_from(offset).unwrap();
            prop_assert_eq!(*record, numbered(expected));
        }

        // Neither cursor ran past what was appended.
        prop_assert!(seen_a.len() <= appended as usize);
        prop_assert!(seen_b.len() + b_start as usize <= appended as usize);
    }
}
