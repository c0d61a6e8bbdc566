//! Core data structures and types for CMOR table processing.
//!
//! Defines attribute values, the parsed table record, table formats and the
//! per-table and per-era report structures.

use crate::constants::{
    ACTUAL_MD5_KEY, GENERAL_KEY, JSON_VARIABLE_ENTRY, LEGACY_VARIABLE_ENTRY,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Value of a table attribute: a single string or an ordered list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Scalar(String),
    List(Vec<String>),
}

impl AttributeValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        AttributeValue::Scalar(value.into())
    }

    /// Build a list from string-like items
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeValue::List(values.into_iter().map(Into::into).collect())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            AttributeValue::Scalar(value) => Some(value),
            AttributeValue::List(_) => None,
        }
    }
}

impl Default for AttributeValue {
    fn default() -> Self {
        AttributeValue::Scalar(String::new())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Scalar(value) => write!(f, "{}", value),
            AttributeValue::List(values) => write!(f, "[{}]", values.join(", ")),
        }
    }
}

/// Attributes of a single entry, in the order they first appeared
pub type EntryAttributes = IndexMap<String, AttributeValue>;

/// Entries of one entry type, keyed by entry name in encounter order
pub type EntryMap = IndexMap<String, EntryAttributes>;

/// Structured content of one metadata table
///
/// `general` holds header attributes plus `actual_md5`; `entries` maps an
/// entry type (`variable`, `axis`, `variable_entry`, ...) to its entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub general: IndexMap<String, AttributeValue>,
    pub entries: IndexMap<String, EntryMap>,
}

impl TableRecord {
    /// Create an empty record carrying only the content digest
    pub fn with_md5(md5_hex: String) -> Self {
        let mut general = IndexMap::new();
        general.insert(ACTUAL_MD5_KEY.to_string(), AttributeValue::Scalar(md5_hex));
        Self {
            general,
            entries: IndexMap::new(),
        }
    }

    /// MD5 hex digest of the raw table bytes
    pub fn actual_md5(&self) -> Option<&str> {
        self.general
            .get(ACTUAL_MD5_KEY)
            .and_then(AttributeValue::as_scalar)
    }

    /// Names held under one top-level key, in encounter order
    ///
    /// `general` shares the namespace with the entry types and resolves to the
    /// general attribute keys, `actual_md5` included.
    pub fn entry_names(&self, key: &str) -> Option<Vec<&str>> {
        if key == GENERAL_KEY {
            return Some(self.general.keys().map(String::as_str).collect());
        }
        self.entries
            .get(key)
            .map(|entries| entries.keys().map(String::as_str).collect())
    }

    pub fn entry(&self, entry_type: &str, name: &str) -> Option<&EntryAttributes> {
        self.entries.get(entry_type)?.get(name)
    }

    /// Keys of the flattened legacy namespace: entry types, then `general`
    pub fn top_level_keys(&self) -> Vec<&str> {
        self.entries
            .keys()
            .map(String::as_str)
            .chain(std::iter::once(GENERAL_KEY))
            .collect()
    }
}

/// On-disk format of a table file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Line-oriented CMOR 2 text table (CMIP3, CMIP5)
    Legacy,
    /// CMOR 3 JSON table (CMIP6)
    Json,
}

impl TableFormat {
    /// Detect table format from the file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TableFormat::Json,
            _ => TableFormat::Legacy,
        }
    }

    /// Entry type holding variable definitions in this format
    pub fn variable_entry_type(&self) -> &'static str {
        match self {
            TableFormat::Legacy => LEGACY_VARIABLE_ENTRY,
            TableFormat::Json => JSON_VARIABLE_ENTRY,
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFormat::Legacy => write!(f, "legacy"),
            TableFormat::Json => write!(f, "json"),
        }
    }
}

/// Variables remaining after coordinate variables are removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableCount {
    pub count: usize,
    pub names: Vec<String>,
}

/// Result of processing one table file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub path: PathBuf,
    pub display_path: String,
    pub format: TableFormat,
    pub md5: String,
    pub variable_count: usize,
    pub variables: Vec<String>,
}

/// A table that could not be read, decoded or queried
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Totals for one archive generation (CMIP3, CMIP5, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EraReport {
    pub mip_id: String,
    pub pattern: String,
    pub tables: Vec<TableReport>,
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<TableFailure>,
}

impl EraReport {
    pub fn new(mip_id: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            mip_id: mip_id.into(),
            pattern: pattern.into(),
            ..Default::default()
        }
    }

    /// Number of table files processed, including ones that failed
    pub fn table_count(&self) -> usize {
        self.tables.len() + self.failures.len()
    }

    /// Sum of variable counts over all successfully processed tables
    pub fn variable_count(&self) -> usize {
        self.tables.iter().map(|table| table.variable_count).sum()
    }
}

/// Census over all requested archive generations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensusReport {
    pub generated_at: DateTime<Utc>,
    pub eras: Vec<EraReport>,
    pub processing_time_ms: u128,
}

impl CensusReport {
    pub fn files_failed(&self) -> usize {
        self.eras.iter().map(|era| era.failures.len()).sum()
    }
}
