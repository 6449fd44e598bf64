//! Error handling using `thiserror` for domain errors and `anyhow` for
//! callback and top-level propagation.

pub mod domain;

pub use domain::WatchError;
