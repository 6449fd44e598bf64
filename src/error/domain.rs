//! Domain-specific error types using `thiserror`.

use std::path::PathBuf;

use {notify::Error as NotifyError, thiserror::Error};

/// Errors raised while setting up or running the watch loop.
///
/// Per-event conditions (parse failures, unknown abbreviations,
/// mismatches) are not errors of the loop; they surface through the alert
/// sink and never unwind it. Everything here is fatal at startup.
#[derive(Error, Debug)]
pub enum WatchError {
    /// The underlying notification source could not be created.
    #[error("create watcher: {0}")]
    Notify(#[from] NotifyError),
    /// A directory could not be subscribed.
    #[error("failed to watch {path:?}: {source}")]
    Subscribe {
        path: PathBuf,
        #[source]
        source: NotifyError,
    },
    /// No watch targets were registered before starting the loop.
    #[error("no folders to watch")]
    NoWatchTargets,
    /// No callbacks were registered before starting the loop.
    #[error("no callbacks registered")]
    NoCallbacks,
    /// The loop already ran; a watcher is single-use.
    #[error("watcher already started")]
    AlreadyStarted,
}
