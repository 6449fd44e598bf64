//! Write-burst suppression for raw change events.
//!
//! Filesystems deliver a single logical "file appeared or changed" as
//! several discrete notifications: a create followed by a write, or a run
//! of writes while a copy is still streaming in. The debouncer remembers
//! the most recent event seen per path and drops a new event that is a
//! continuation of a write burst on the same path.

use std::{
    collections::HashMap,
    path::PathBuf,
    time::{Duration, Instant},
};

use crate::watcher::events::{ChangeEvent, Op};

/// Window within which a write-family event counts as a continuation of
/// the previous one on the same path.
const CONTINUATION_WINDOW: Duration = Duration::from_secs(1);

/// How long a per-path record is retained after its last event.
const RETENTION_WINDOW: Duration = Duration::from_secs(30);

/// Most recently seen event for one path.
#[derive(Debug, Clone, Copy)]
struct DebounceEntry {
    ops: Op,
    seen_at: Instant,
}

/// Per-path log of recently seen events.
///
/// At most one entry exists per distinct path. The single consumer loop is
/// the only writer, so no locking is needed.
#[derive(Debug, Default)]
pub struct WriteDebouncer {
    entries: HashMap<PathBuf, DebounceEntry>,
}

impl WriteDebouncer {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Records `event` and reports whether it should be dispatched.
    ///
    /// An event is suppressed when the previous event on the same path was
    /// seen under a second ago and both carry a write-family operation.
    /// The stored record is replaced either way, so a rapid burst is always
    /// compared against its latest member rather than its first.
    pub fn admit(&mut self, event: &ChangeEvent) -> bool {
        let continuation = self.entries.get(&event.path).is_some_and(|prev| {
            event.received_at.duration_since(prev.seen_at) < CONTINUATION_WINDOW
                && prev.ops.intersects(Op::WRITE_FAMILY)
                && event.ops.intersects(Op::WRITE_FAMILY)
        });

        self.entries.insert(
            event.path.clone(),
            DebounceEntry {
                ops: event.ops,
                seen_at: event.received_at,
            },
        );

        !continuation
    }

    /// Drops records not touched within the retention window.
    ///
    /// Bounds memory for paths that see no further activity; correctness
    /// of suppression rests on the continuation window alone.
    pub fn purge(&mut self, now: Instant) {
        self.entries
            .retain(|_, entry| now.duration_since(entry.seen_at) <= RETENTION_WINDOW);
    }

    /// Number of paths currently tracked.
    pub fn tracked_paths(&self) -> usize {
        self.entries.len()
    }
}
