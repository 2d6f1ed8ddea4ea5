//! Traits for the capabilities the converter borrows from its environment.
//!
//! The renderers never parse office formats themselves. They ask a
//! [`TextExtractor`] for the plain text of a word-processor document and a
//! [`TableReader`] for the rows of a workbook, so either can be swapped out
//! (e.g. for a stub in tests) without touching the layout code.

use std::fmt::Debug;
use thiserror::Error;

/// Error type for collaborator failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Not a valid archive: {0}")]
    Archive(String),

    #[error("Required part '{0}' is missing")]
    MissingPart(String),

    #[error("Malformed content: {0}")]
    Malformed(String),

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err.to_string())
    }
}

/// The first table of a workbook: its name and its rows of stringified cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Produces the raw text of a word-processor document.
///
/// Paragraphs are separated by newlines; no formatting survives.
pub trait TextExtractor: Send + Sync + Debug {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, SourceError>;

    /// Returns a human-readable name for this extractor (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Reads the first sheet of a workbook. Later sheets are ignored.
pub trait TableReader: Send + Sync + Debug {
    fn read_first_table(&self, bytes: &[u8]) -> Result<Table, SourceError>;

    /// Returns a human-readable name for this reader (for logging/debugging).
    fn name(&self) -> &'static str;
}
