//! Name-attribute extraction and placement matching.
//!
//! Folder and file names encode frame metadata; this module extracts it,
//! compares file against folder, and raises alerts for misplaced files.

pub mod attributes;
pub mod checker;
pub mod matcher;

pub use {
    attributes::{AttributeSet, ExtractError, NamePatterns, PatternError},
    checker::PlacementChecker,
    matcher::{FrameTypeMapping, PlacementVerdict},
};
