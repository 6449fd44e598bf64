//! Attribute extraction from file and folder names.
//!
//! Names encode a frame size (`11x14`) and, optionally, a frame type
//! phrase or abbreviation. Extraction runs an ordered list of patterns
//! with the named capture groups `frame_type` and `frame_size` over the
//! lowercased name and takes the first pattern that matches.

use std::{collections::HashMap, path::Path};

use {regex::Regex, thiserror::Error};

/// Capture group name for the frame type attribute.
pub const ATTR_FRAME_TYPE: &str = "frame_type";

/// Capture group name for the frame size attribute.
pub const ATTR_FRAME_SIZE: &str = "frame_size";

/// A name pattern whose source failed to compile.
#[derive(Error, Debug)]
#[error("invalid name pattern {pattern:?}: {source}")]
pub struct PatternError {
    /// The offending pattern source.
    pub pattern: String,
    #[source]
    source: regex::Error,
}

/// A name that did not yield the attributes mandatory for its kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// No pattern yielded a frame type.
    #[error("no pattern yields a frame type for {name:?}")]
    MissingFrameType { name: String },
    /// No pattern yielded a frame size.
    #[error("no pattern yields a frame size for {name:?}")]
    MissingFrameSize { name: String },
}

/// Attributes extracted from a single name, normalized to lowercase and
/// trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSet {
    /// Frame type phrase or abbreviation; empty for a plain, unframed
    /// folder.
    pub frame_type: String,
    /// Frame size token such as `11x14`.
    pub frame_size: String,
}

/// Ordered list of independently compiled name patterns.
///
/// Matching behaves as alternation tried left to right: the first pattern
/// that matches a name supplies the captured attributes. Patterns stay
/// separate rather than being joined into one alternation source, so one
/// pattern's grouping can never change another's precedence.
#[derive(Debug, Clone)]
pub struct NamePatterns {
    patterns: Vec<Regex>,
}

impl NamePatterns {
    /// Compiles the pattern sources, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` naming the first source that fails to
    /// compile.
    pub fn new<S: AsRef<str>>(sources: &[S]) -> Result<Self, PatternError> {
        let mut patterns = Vec::with_capacity(sources.len());

        for source in sources {
            let source = source.as_ref();
            let pattern = Regex::new(source).map_err(|e| PatternError {
                pattern: source.to_string(),
                source: e,
            })?;
            patterns.push(pattern);
        }

        Ok(Self { patterns })
    }

    /// Captures named groups from the first matching pattern.
    ///
    /// Groups that did not participate, or captured only whitespace, are
    /// absent from the result. An empty map means no pattern matched or
    /// the match captured nothing usable.
    fn capture(&self, name: &str) -> HashMap<String, String> {
        for pattern in &self.patterns {
            let Some(captures) = pattern.captures(name) else {
                continue;
            };

            let mut attributes = HashMap::new();
            for group in pattern.capture_names().flatten() {
                if let Some(value) = captures.name(group) {
                    let value = value.as_str().trim().to_lowercase();
                    if !value.is_empty() {
                        attributes.insert(group.to_string(), value);
                    }
                }
            }

            return attributes;
        }

        HashMap::new()
    }
}

/// Extracts the attributes encoded in a file name.
///
/// The extension is stripped and the rest lowercased before matching.
/// Both attributes are mandatory for files.
///
/// # Errors
///
/// Returns `ExtractError` when no pattern yields a frame type, or none
/// yields a frame size.
pub fn file_attributes(
    file_name: &str,
    patterns: &NamePatterns,
) -> Result<AttributeSet, ExtractError> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let mut attributes = patterns.capture(&stem.to_lowercase());

    let frame_type =
        attributes
            .remove(ATTR_FRAME_TYPE)
            .ok_or_else(|| ExtractError::MissingFrameType {
                name: file_name.to_string(),
            })?;
    let frame_size =
        attributes
            .remove(ATTR_FRAME_SIZE)
            .ok_or_else(|| ExtractError::MissingFrameSize {
                name: file_name.to_string(),
            })?;

    Ok(AttributeSet {
        frame_type,
        frame_size,
    })
}

/// Extracts the attributes encoded in a folder name (basename only).
///
/// The frame size is mandatory; an absent frame type becomes the empty
/// string, meaning a plain, unframed folder.
///
/// # Errors
///
/// Returns `ExtractError` when no pattern yields a frame size.
pub fn folder_attributes(
    folder_name: &str,
    patterns: &NamePatterns,
) -> Result<AttributeSet, ExtractError> {
    let mut attributes = patterns.capture(&folder_name.to_lowercase());

    let frame_size =
        attributes
            .remove(ATTR_FRAME_SIZE)
            .ok_or_else(|| ExtractError::MissingFrameSize {
                name: folder_name.to_string(),
            })?;
    let frame_type = attributes.remove(ATTR_FRAME_TYPE).unwrap_or_default();

    Ok(AttributeSet {
        frame_type,
        frame_size,
    })
}
