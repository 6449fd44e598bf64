//! Watcher configuration loading and validation.
//!
//! The config file is JSON: the folders to watch (as globs), the ordered
//! name patterns, the frame type mapping, and the optional notifier
//! command. Everything is loaded and validated once at startup; the core
//! assumes a validated config from then on.

use std::{
    collections::HashMap,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use {
    glob::glob,
    serde::{Deserialize, Serialize},
    serde_json::from_str,
    thiserror::Error,
    tracing::{debug, warn},
};

use crate::naming::attributes::{NamePatterns, PatternError};

/// Error type for configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Failed to deserialize the config file.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    /// The config file does not exist.
    #[error("failed to find watcher config file at {path:?}")]
    MissingFile { path: PathBuf },
    /// No include folders configured.
    #[error("no folders to watch specified")]
    NoWatchFolders,
    /// The include globs expanded to nothing.
    #[error("no folders to watch under given config")]
    EmptyWatchList,
    /// A pattern list is empty.
    #[error("no {kind} name patterns specified")]
    NoPatterns { kind: &'static str },
    /// A pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// An include glob is malformed.
    #[error("invalid include glob {pattern:?}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    /// The frame type mapping is empty.
    #[error("frame type mapping is empty")]
    EmptyMapping,
    /// A mapping entry has no candidate folder names.
    #[error("no folder names configured for frame type {abbreviation:?}")]
    EmptyCandidates { abbreviation: String },
    /// An alert command was configured without a program.
    #[error("alert command is empty")]
    EmptyAlertCommand,
}

/// Serializable watcher settings with workable defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    /// Glob patterns expanding to the directories to watch.
    pub include_folders: Vec<String>,
    /// Exact paths dropped from the expanded include list.
    pub exclude_folders: Vec<String>,
    /// Ordered folder-name patterns with `frame_type` / `frame_size`
    /// capture groups.
    pub folder_patterns: Vec<String>,
    /// Ordered file-name patterns with `frame_type` / `frame_size`
    /// capture groups.
    pub file_patterns: Vec<String>,
    /// Frame type abbreviation to the folder-name type phrases accepted
    /// for it.
    pub frame_type_mapping: HashMap<String, Vec<String>>,
    /// External notifier command; alerts go to the log when unset.
    pub alert_command: Option<Vec<String>>,
    /// Enables debug logging, same as `--verbose`.
    pub debug: bool,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            include_folders: vec![],
            exclude_folders: vec![],
            folder_patterns: vec![
                r"^(?P<frame_size>\d+x\d+)$".to_string(),
                r"^(?P<frame_size>\d+x\d+) (?P<frame_type>(floating )?((white|gray|black|gold) )?framed)$".to_string(),
                r"^(?P<frame_type>(floating )?((white|gray|black|gold) )?framed( \d+pc)?) (?P<frame_size>\d+x\d+)$".to_string(),
                r"^(?P<frame_type>(wood|wood horz|wood vert|wood crx|framed)( \d+pc)?) (?P<frame_size>\d+x\d+)$".to_string(),
            ],
            file_patterns: vec![
                r"^.+_(?P<frame_type>[a-z]+)_(?P<frame_size>\d+x\d+)$".to_string(),
                r"^.+_(?P<frame_type>[a-z]+_\d+pc)_(?P<frame_size>\d+x\d+)$".to_string(),
                r"^.+_(?P<frame_type>[a-z]+_(?:crx|horz|vert))_(?P<frame_size>\d+x\d+)$".to_string(),
            ],
            frame_type_mapping: default_frame_type_mapping(),
            alert_command: None,
            debug: false,
        }
    }
}

fn default_frame_type_mapping() -> HashMap<String, Vec<String>> {
    let entries: [(&str, &[&str]); 9] = [
        ("fr", &["framed"]),
        ("fr_2pc", &["framed 2pc"]),
        ("fr_3pc", &["framed 3pc"]),
        ("bfr", &["black framed"]),
        ("gfr", &["gray framed"]),
        ("wfr", &["white framed"]),
        (
            "ffl",
            &[
                "floating gray framed",
                "floating black framed",
                "floating gold framed",
            ],
        ),
        ("wd", &["wood"]),
        ("pl", &[""]),
    ];

    entries
        .iter()
        .map(|(abbreviation, candidates)| {
            (
                abbreviation.to_string(),
                candidates.iter().map(|c| c.to_string()).collect(),
            )
        })
        .collect()
}

impl WatchSettings {
    /// Loads settings from a JSON config file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the config file.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `WatchSettings` or a `ConfigError`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the file is missing, unreadable, or
    /// malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        debug!("Loading settings from {:?}", path);
        let contents = read_to_string(path)?;
        Ok(from_str(&contents)?)
    }

    /// Checks the invariants the core assumes from then on: folders to
    /// watch, compilable non-empty pattern lists, and a usable mapping.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a `ConfigError`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.include_folders.is_empty() {
            return Err(ConfigError::NoWatchFolders);
        }
        if self.folder_patterns.is_empty() {
            return Err(ConfigError::NoPatterns { kind: "folder" });
        }
        if self.file_patterns.is_empty() {
            return Err(ConfigError::NoPatterns { kind: "file" });
        }

        NamePatterns::new(&self.folder_patterns)?;
        NamePatterns::new(&self.file_patterns)?;

        if self.frame_type_mapping.is_empty() {
            return Err(ConfigError::EmptyMapping);
        }
        for (abbreviation, candidates) in &self.frame_type_mapping {
            if candidates.is_empty() {
                return Err(ConfigError::EmptyCandidates {
                    abbreviation: abbreviation.clone(),
                });
            }
        }

        if let Some(command) = &self.alert_command
            && command.is_empty()
        {
            return Err(ConfigError::EmptyAlertCommand);
        }

        Ok(())
    }

    /// Expands the include globs and removes excluded paths.
    ///
    /// Resolved once at startup; the result stays fixed for the process
    /// lifetime.
    ///
    /// # Returns
    ///
    /// A `Result` containing the directories to watch or a `ConfigError`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on a malformed glob or when nothing is left
    /// to watch.
    pub fn resolve_watch_list(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let mut watch_list = Vec::new();

        for pattern in &self.include_folders {
            let entries = glob(pattern).map_err(|source| ConfigError::Glob {
                pattern: pattern.clone(),
                source,
            })?;

            for entry in entries {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        warn!("skipping unreadable path under {:?}: {}", pattern, e);
                        continue;
                    }
                };

                if self
                    .exclude_folders
                    .iter()
                    .any(|excluded| Path::new(excluded) == path)
                {
                    debug!("excluding folder: {:?}", path);
                    continue;
                }

                watch_list.push(path);
            }
        }

        if watch_list.is_empty() {
            return Err(ConfigError::EmptyWatchList);
        }

        Ok(watch_list)
    }
}
