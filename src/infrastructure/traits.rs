//! I/O boundary traits for testability
//!
//! These traits abstract the unit data source and the interactive picker,
//! allowing the selector session to be tested with mock implementations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::{UnitId, UnitSnapshot};

/// Failure to obtain a unit snapshot.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("cannot read units from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse units from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unit source unavailable: {message}")]
    Unavailable { message: String },
}

/// Source of the full flat list of organizational units.
///
/// One call returns the whole snapshot; no pagination or streaming.
pub trait UnitRepository: Send + Sync {
    fn fetch_all(&self) -> Result<UnitSnapshot, FetchError>;
}

/// Item for FZF-style picking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    /// Display text shown in picker
    pub display: String,
    pub id: UnitId,
}

/// Interactive FZF-style multi-picker abstraction.
pub trait Picker: Send + Sync {
    /// Present items to user and return the chosen ones.
    /// Returns an empty list if user cancels (Esc/Ctrl-C).
    fn pick_many(&self, items: &[PickItem], prompt: &str) -> Result<Vec<PickItem>, String>;
}

/// Map picker output lines back to the items they were rendered from.
///
/// Labels must be unique for this to be exact; unknown lines are dropped.
pub fn resolve_picked<'l>(
    items: &[PickItem],
    lines: impl IntoIterator<Item = &'l str>,
) -> Vec<PickItem> {
    lines
        .into_iter()
        .filter_map(|line| items.iter().find(|i| i.display == line).cloned())
        .collect()
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Reads a `{"units": [...]}` JSON document from disk.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UnitRepository for JsonFileRepository {
    fn fetch_all(&self) -> Result<UnitSnapshot, FetchError> {
        debug!("fetch_all: path={}", self.path.display());
        let content = std::fs::read_to_string(&self.path).map_err(|e| FetchError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| FetchError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Serves a fixed in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticRepository {
    snapshot: UnitSnapshot,
}

impl StaticRepository {
    pub fn new(snapshot: impl Into<UnitSnapshot>) -> Self {
        Self {
            snapshot: snapshot.into(),
        }
    }
}

impl UnitRepository for StaticRepository {
    fn fetch_all(&self) -> Result<UnitSnapshot, FetchError> {
        Ok(self.snapshot.clone())
    }
}

/// Real picker implementation using skim (FZF-like).
#[derive(Debug, Default)]
pub struct SkimPicker {
    /// Height of the picker, e.g. "50%" or "20"
    pub height: String,
}

impl SkimPicker {
    pub fn new(height: impl Into<String>) -> Self {
        Self {
            height: height.into(),
        }
    }
}

impl Picker for SkimPicker {
    fn pick_many(&self, items: &[PickItem], prompt: &str) -> Result<Vec<PickItem>, String> {
        use skim::prelude::*;
        use std::io::Cursor;

        if items.is_empty() {
            return Ok(Vec::new());
        }

        // Build input as newline-separated display strings
        let input = items
            .iter()
            .map(|i| i.display.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let height = if self.height.is_empty() {
            "50%"
        } else {
            self.height.as_str()
        };

        let options = SkimOptionsBuilder::default()
            .prompt(Some(prompt))
            .height(Some(height))
            .multi(true)
            .build()
            .map_err(|e| format!("failed to build skim options: {e}"))?;

        let item_reader = SkimItemReader::default();
        let items_arc = item_reader.of_bufread(Cursor::new(input));

        match Skim::run_with(&options, Some(items_arc)) {
            Some(out) if out.is_abort => Ok(Vec::new()),
            Some(out) => {
                let lines: Vec<String> = out
                    .selected_items
                    .iter()
                    .map(|selected| selected.output().to_string())
                    .collect();
                Ok(resolve_picked(items, lines.iter().map(String::as_str)))
            }
            None => Ok(Vec::new()),
        }
    }
}
