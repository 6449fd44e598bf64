//! Change-event representation decoupled from the notification primitive.
//!
//! The rest of the crate never touches `notify`'s event structs directly;
//! the translation here happens once, at the boundary.

use std::{path::PathBuf, time::Instant};

use {
    bitflags::bitflags,
    notify::{
        Event,
        event::{EventKind, ModifyKind},
    },
};

bitflags! {
    /// File operations reported for a single path. Platforms may coalesce
    /// notifications, so several bits can be set at once.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Op: u8 {
        /// A file or directory was created.
        const CREATE = 1 << 0;
        /// File contents were written.
        const WRITE = 1 << 1;
        /// A file or directory was removed.
        const REMOVE = 1 << 2;
        /// A file or directory was renamed or moved.
        const RENAME = 1 << 3;
        /// Permissions or other metadata changed.
        const CHMOD = 1 << 4;
    }
}

impl Op {
    /// Operations that signal new or still-changing file contents.
    pub const WRITE_FAMILY: Op = Op::CREATE.union(Op::WRITE);
}

/// A single filesystem change on a single path.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Affected file or directory.
    pub path: PathBuf,
    /// Operations reported for the path.
    pub ops: Op,
    /// When the event arrived from the notification source.
    pub received_at: Instant,
}

impl ChangeEvent {
    /// Creates an event stamped with the current time.
    pub fn new(path: impl Into<PathBuf>, ops: Op) -> Self {
        Self {
            path: path.into(),
            ops,
            received_at: Instant::now(),
        }
    }

    /// Translates a raw notify event into zero or more change events, one
    /// per affected path. Access and other uninteresting kinds are dropped
    /// here so downstream code only ever sees the five operations above.
    pub fn from_notify(event: &Event, received_at: Instant) -> Vec<ChangeEvent> {
        let ops = match event.kind {
            EventKind::Create(_) => Op::CREATE,
            EventKind::Modify(ModifyKind::Name(_)) => Op::RENAME,
            EventKind::Modify(ModifyKind::Metadata(_)) => Op::CHMOD,
            EventKind::Modify(_) => Op::WRITE,
            EventKind::Remove(_) => Op::REMOVE,
            EventKind::Any | EventKind::Access(_) | EventKind::Other => Op::empty(),
        };

        if ops.is_empty() {
            return Vec::new();
        }

        event
            .paths
            .iter()
            .map(|path| ChangeEvent {
                path: path.clone(),
                ops,
                received_at,
            })
            .collect()
    }
}
