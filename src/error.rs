//! Error handling for CMOR table census operations.
//!
//! Covers text decoding of table files, lookups of entry types that a
//! table does not define, glob expansion and configuration problems.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CensusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table content is not valid UTF-8: {source}")]
    Decode {
        #[from]
        source: std::str::Utf8Error,
    },

    #[error("Entry type '{entry_type}' not found in table (available: {})", .available.join(", "))]
    MissingEntryType {
        entry_type: String,
        available: Vec<String>,
    },

    #[error("JSON table error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid table pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("Processing failed for table: {path} - {source}")]
    TableFailed {
        path: PathBuf,
        #[source]
        source: Box<CensusError>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl CensusError {
    /// Attach the path of the table file being processed
    pub fn for_table(self, path: impl Into<PathBuf>) -> Self {
        Self::TableFailed {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CensusError>;
