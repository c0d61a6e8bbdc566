//! Variable count query over parsed tables.
//!
//! Counts the entries of one entry type, leaving out auxiliary coordinate
//! variables such as the hybrid-level `a`/`b` terms.

use crate::config::QueryConfig;
use crate::error::{CensusError, Result};
use crate::models::{TableRecord, VariableCount};
use tracing::debug;

/// Count variables of `entry_type` using the default coordinate exclusions
pub fn count_variables_default(record: &TableRecord, entry_type: &str) -> Result<VariableCount> {
    count_variables(record, entry_type, &QueryConfig::default())
}

/// Count the names under `entry_type` that are not coordinate variables
///
/// Names are returned in the order the table defines them. `general` is a
/// valid key and counts the general attribute keys. A table without
/// `entry_type` is an error, not an empty count.
pub fn count_variables(
    record: &TableRecord,
    entry_type: &str,
    config: &QueryConfig,
) -> Result<VariableCount> {
    let entries = record
        .entry_names(entry_type)
        .ok_or_else(|| CensusError::MissingEntryType {
            entry_type: entry_type.to_string(),
            available: record
                .top_level_keys()
                .into_iter()
                .map(String::from)
                .collect(),
        })?;
    let total = entries.len();

    let names: Vec<String> = entries
        .into_iter()
        .filter(|name| !config.is_coordinate(name))
        .map(String::from)
        .collect();

    debug!(
        "{} of {} '{}' entries are variables",
        names.len(),
        total,
        entry_type
    );

    Ok(VariableCount {
        count: names.len(),
        names,
    })
}
