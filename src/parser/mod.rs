//! Legacy CMOR 2 text table parser
//!
//! CMIP3 and CMIP5 tables are line-oriented: a block of `key: value` header
//! attributes, then repeated entry blocks opened by `<type>_entry: <name>`
//! lines. Comments start with `!`, either on their own line or after a value.
//!
//! ```text
//! table_id: Table Amon
//! modeling_realm: atmos
//!
//! !============
//! variable_entry:    ta
//! !============
//! units:             K
//! dimensions:        longitude latitude plev17 time
//! ```
//!
//! Parsing is best-effort and never fails on malformed lines; only content
//! that is not valid UTF-8 is rejected.
//!
//! ## Architecture
//!
//! - [`lines`] - line queue with one-line push-back and line normalization
//! - [`accumulate`] - key/value splitting and repeated-key accumulation rules

pub mod accumulate;
pub mod lines;

use self::accumulate::{
    accumulate_entry, accumulate_general, entry_key_value, header_key_value, merge_into,
};
use self::lines::{LineQueue, is_ignorable};

use crate::config::ParserConfig;
use crate::constants::{ENTRY_MARKER, ENTRY_SEPARATOR};
use crate::error::Result;
use crate::models::{AttributeValue, EntryMap, TableRecord};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// MD5 hex digest of raw table bytes
pub fn content_md5(raw: &[u8]) -> String {
    format!("{:x}", md5::compute(raw))
}

/// Parse a legacy text table with the default keyword sets and no quirks
pub fn parse_legacy_table_default(raw: &[u8]) -> Result<TableRecord> {
    parse_legacy_table(raw, &ParserConfig::default())
}

/// Parse a legacy text table into a [`TableRecord`]
///
/// The MD5 digest of `raw` is stored under `actual_md5` in the general
/// attributes. Fails only with [`CensusError::Decode`](crate::error::CensusError::Decode).
pub fn parse_legacy_table(raw: &[u8], config: &ParserConfig) -> Result<TableRecord> {
    let mut record = TableRecord::with_md5(content_md5(raw));
    let text = std::str::from_utf8(raw)?;

    let mut lines = LineQueue::new(text, config.quirks.truncate_final_character);
    parse_header(&mut lines, &mut record.general, config);
    parse_entries(&mut lines, &mut record.entries, config);

    debug!(
        "Parsed legacy table: {} general attributes, {} entry types",
        record.general.len(),
        record.entries.len()
    );

    Ok(record)
}

/// Consume header attributes up to the first entry marker
fn parse_header<'a>(
    lines: &mut LineQueue<'a>,
    general: &mut IndexMap<String, AttributeValue>,
    config: &ParserConfig,
) {
    while let Some(line) = lines.pop() {
        if is_ignorable(line) {
            continue;
        }

        if line.contains(ENTRY_MARKER) {
            lines.push_back(line);
            return;
        }

        let (key, value) = header_key_value(line, &config.quirks);
        trace!("Header attribute {} = {:?}", key, value);
        merge_into(general, &key, |existing| accumulate_general(existing, value));
    }
}

/// Consume entry blocks until the queue is exhausted
fn parse_entries<'a>(
    lines: &mut LineQueue<'a>,
    entries: &mut IndexMap<String, EntryMap>,
    config: &ParserConfig,
) {
    while let Some(line) = lines.pop() {
        if is_ignorable(line) {
            continue;
        }

        let (entry_type, entry_name) = split_entry_header(line);
        trace!("Entry {} of type {}", entry_name, entry_type);

        let attributes = entries
            .entry(entry_type.to_string())
            .or_default()
            .entry(entry_name.to_string())
            .or_default();

        while let Some(line) = lines.pop() {
            if is_ignorable(line) {
                continue;
            }

            if line.contains(ENTRY_SEPARATOR) {
                lines.push_back(line);
                break;
            }

            let (key, value) = entry_key_value(line);
            let is_list = config.is_list_keyword(key);
            merge_into(attributes, key, |existing| {
                accumulate_entry(existing, value, is_list, &config.quirks)
            });
        }
    }
}

/// Split an entry header line into (entry type, entry name)
///
/// A marker without the colon (`axis_entry time`) splits on `_entry` alone.
fn split_entry_header(line: &str) -> (&str, &str) {
    let mut parts = line.split(ENTRY_SEPARATOR);
    match (parts.next(), parts.next()) {
        (Some(entry_type), Some(name)) => (entry_type.trim(), name.trim()),
        _ => match line.split_once(ENTRY_MARKER) {
            Some((entry_type, name)) => (entry_type.trim(), name.trim()),
            None => (line.trim(), ""),
        },
    }
}
