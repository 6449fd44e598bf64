//! Watcher configuration management.

pub mod settings;

pub use settings::{ConfigError, WatchSettings};
