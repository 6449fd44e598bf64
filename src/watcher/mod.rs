//! Folder watching with write-burst debouncing and ordered callback dispatch.
//!
//! The `FolderWatcher` owns the subscription to the OS notification layer,
//! feeds every raw event through the [`WriteDebouncer`], and hands admitted
//! events to the registered callbacks one at a time. A single consumer loop
//! services the event stream, the transport-error stream, and the shutdown
//! signal, so callbacks never run concurrently and alerts come out in the
//! order events were admitted.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Instant,
};

use {
    async_channel::{Receiver, Sender, bounded, unbounded},
    notify::{
        Config, Error, Event, RecommendedWatcher,
        RecursiveMode::NonRecursive,
        Watcher,
    },
    tokio::select,
    tracing::{debug, error, info},
};

use crate::error::domain::WatchError;

mod debouncer;
mod events;

pub use {
    debouncer::WriteDebouncer,
    events::{ChangeEvent, Op},
};

/// A callback invoked for every admitted change event.
///
/// Callbacks must be fast and non-blocking: the loop dispatches them
/// sequentially and waits for each one before touching the next event.
pub type WatchCallback = Box<dyn FnMut(&ChangeEvent) -> anyhow::Result<()> + Send>;

/// Lifecycle of the watch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Constructed; the loop has not started.
    Idle,
    /// Subscribed and consuming events.
    Running,
    /// Terminal; the subscription has been released.
    Stopped,
}

/// Why a completed watch loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A shutdown signal was received.
    Cancelled,
    /// The notification source closed its streams.
    SourceClosed,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StopReason::Cancelled => write!(f, "cancelled"),
            StopReason::SourceClosed => write!(f, "event source closed"),
        }
    }
}

/// Sends the shutdown signal to a running [`FolderWatcher`].
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Sender<()>,
}

impl ShutdownHandle {
    /// Requests loop termination. Safe to call more than once.
    pub fn shutdown(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Watches a fixed set of directories and drives the callback pipeline.
pub struct FolderWatcher {
    /// Internal notify watcher; `None` once released (or in tests).
    watcher: Option<RecommendedWatcher>,
    event_rx: Receiver<ChangeEvent>,
    error_rx: Receiver<Error>,
    shutdown_tx: Sender<()>,
    shutdown_rx: Receiver<()>,
    watched: Vec<PathBuf>,
    callbacks: Vec<WatchCallback>,
    debouncer: WriteDebouncer,
    state: WatchState,
}

impl FolderWatcher {
    /// Creates the watcher and its notification subscription.
    ///
    /// Nothing is watched until [`FolderWatcher::add_folders`] is called.
    ///
    /// # Errors
    ///
    /// Returns `WatchError` if the underlying notification source cannot
    /// be created.
    pub fn new() -> Result<Self, WatchError> {
        let (event_tx, event_rx) = unbounded();
        let (error_tx, error_rx) = unbounded();
        let (shutdown_tx, shutdown_rx) = bounded(1);

        let watcher = RecommendedWatcher::new(
            move |res: Result<Event, Error>| match res {
                Ok(event) => {
                    for change in ChangeEvent::from_notify(&event, Instant::now()) {
                        if event_tx.try_send(change).is_err() {
                            // Receiver gone: the loop has stopped.
                            return;
                        }
                    }
                }
                Err(e) => {
                    let _ = error_tx.try_send(e);
                }
            },
            Config::default(),
        )?;

        Ok(Self {
            watcher: Some(watcher),
            event_rx,
            error_rx,
            shutdown_tx,
            shutdown_rx,
            watched: Vec::new(),
            callbacks: Vec::new(),
            debouncer: WriteDebouncer::new(),
            state: WatchState::Idle,
        })
    }

    /// Subscribes the given directories.
    ///
    /// Watching is non-recursive: the include globs already expanded to the
    /// exact set of directories to observe.
    ///
    /// # Errors
    ///
    /// Returns `WatchError` naming the first directory that could not be
    /// subscribed.
    pub fn add_folders<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), WatchError> {
        for path in paths {
            let path = path.as_ref();

            if let Some(watcher) = self.watcher.as_mut() {
                watcher
                    .watch(path, NonRecursive)
                    .map_err(|source| WatchError::Subscribe {
                        path: path.to_path_buf(),
                        source,
                    })?;
            }

            self.watched.push(path.to_path_buf());
            debug!("Watching folder: {:?}", path);
        }

        Ok(())
    }

    /// Registers callbacks; dispatch happens in registration order.
    pub fn add_callbacks(&mut self, callbacks: Vec<WatchCallback>) {
        self.callbacks.extend(callbacks);
    }

    /// Returns a handle that can stop the loop from another task.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Runs the loop until cancellation or source closure.
    ///
    /// # Errors
    ///
    /// Fails without entering `Running` when no folders or no callbacks
    /// are registered, or when the loop has already run.
    pub async fn watch(&mut self) -> Result<StopReason, WatchError> {
        if self.state != WatchState::Idle {
            return Err(WatchError::AlreadyStarted);
        }
        if self.watched.is_empty() {
            return Err(WatchError::NoWatchTargets);
        }
        if self.callbacks.is_empty() {
            return Err(WatchError::NoCallbacks);
        }

        self.state = WatchState::Running;
        let reason = self.run().await;
        self.state = WatchState::Stopped;
        self.close();

        Ok(reason)
    }

    async fn run(&mut self) -> StopReason {
        let shutdown_rx = self.shutdown_rx.clone();
        let event_rx = self.event_rx.clone();
        let error_rx = self.error_rx.clone();

        loop {
            self.debouncer.purge(Instant::now());

            select! {
                // Shutdown is checked first so cancellation stays prompt
                // even under a backlog of pending events.
                biased;

                _ = shutdown_rx.recv() => {
                    info!("shutdown requested, stopping watch loop");
                    return StopReason::Cancelled;
                }

                event = event_rx.recv() => match event {
                    Ok(event) => self.dispatch(&event),
                    Err(_) => {
                        debug!("event channel closed");
                        return StopReason::SourceClosed;
                    }
                },

                err = error_rx.recv() => match err {
                    Ok(e) => error!("notification source error: {}", e),
                    Err(_) => {
                        debug!("error channel closed");
                        return StopReason::SourceClosed;
                    }
                },
            }
        }
    }

    /// Feeds one raw event through the debouncer and, if admitted, runs
    /// every callback in registration order. A callback failure is logged
    /// and never blocks the remaining callbacks.
    fn dispatch(&mut self, event: &ChangeEvent) {
        debug!("received event: {:?}", event);

        if !self.debouncer.admit(event) {
            info!("ignoring consecutive write events for {:?}", event.path);
            return;
        }

        for (index, callback) in self.callbacks.iter_mut().enumerate() {
            if let Err(e) = callback(event) {
                error!("applying callback[{}]: {:#}", index, e);
            }
        }
    }

    /// Releases the notification subscription.
    ///
    /// Idempotent, and safe to call even if the loop never ran.
    pub fn close(&mut self) {
        if self.watcher.take().is_some() {
            info!("Closing watcher");
        }
    }
}
