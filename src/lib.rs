//! Framewatch - folder placement watcher for framed print workflows.
//!
//! Watches configured directories for new or changed files, extracts
//! frame size and frame type attributes from file and parent-folder names
//! with configurable patterns, and raises an alert whenever a file sits
//! in a folder whose name disagrees with the file's own encoded
//! attributes. It only reports: files are never moved or renamed.

pub mod alert;
pub mod config;
pub mod error;
pub mod naming;
pub mod watcher;

// Re-export key types for convenience
pub use {
    alert::{AlertError, AlertSink, CommandAlertSink, LogAlertSink, RecordingAlertSink},
    config::{ConfigError, WatchSettings},
    error::WatchError,
    naming::{
        AttributeSet, ExtractError, FrameTypeMapping, NamePatterns, PlacementChecker,
        PlacementVerdict,
    },
    watcher::{ChangeEvent, FolderWatcher, Op, ShutdownHandle, StopReason, WatchCallback,
        WatchState, WriteDebouncer},
};
