//! CMOR 3 JSON table reader.
//!
//! CMIP6 tables are JSON documents with a `Header` object and one object per
//! entry type (`variable_entry`, `axis_entry`, ...). They are mapped onto the
//! same [`TableRecord`] shape the legacy parser produces so the variable query
//! treats both formats alike.

use crate::constants::JSON_HEADER_KEY;
use crate::error::Result;
use crate::models::{AttributeValue, EntryAttributes, EntryMap, TableRecord};
use crate::parser::content_md5;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Read a JSON table into a [`TableRecord`]
///
/// Header fields and top-level scalars become general attributes. Every other
/// top-level object becomes an entry type, whatever its members hold.
pub fn read_json_table(raw: &[u8]) -> Result<TableRecord> {
    let mut record = TableRecord::with_md5(content_md5(raw));
    let text = std::str::from_utf8(raw)?;
    let document: Map<String, Value> = serde_json::from_str(text)?;

    for (key, value) in document {
        match value {
            Value::Object(header) if key == JSON_HEADER_KEY => {
                for (field, value) in header {
                    record.general.insert(field, attribute_value(value));
                }
            }
            Value::Object(members) => {
                let entries = entry_map(&key, members);
                record.entries.insert(key, entries);
            }
            other => {
                record.general.insert(key, attribute_value(other));
            }
        }
    }

    debug!(
        "Read JSON table: {} general attributes, {} entry types",
        record.general.len(),
        record.entries.len()
    );

    Ok(record)
}

/// Entries of one entry type; a member that is not an object is still an
/// entry, with no attributes
fn entry_map(entry_type: &str, members: Map<String, Value>) -> EntryMap {
    members
        .into_iter()
        .map(|(name, value)| match value {
            Value::Object(attributes) => (name, entry_attributes(attributes)),
            other => {
                warn!(
                    "'{}' in '{}' is not an object, keeping it without attributes: {}",
                    name, entry_type, other
                );
                (name, EntryAttributes::new())
            }
        })
        .collect()
}

fn entry_attributes(attributes: Map<String, Value>) -> EntryAttributes {
    attributes
        .into_iter()
        .map(|(key, value)| (key, attribute_value(value)))
        .collect()
}

fn attribute_value(value: Value) -> AttributeValue {
    match value {
        Value::String(text) => AttributeValue::Scalar(text),
        Value::Array(items) => AttributeValue::List(items.into_iter().map(scalar_text).collect()),
        other => AttributeValue::Scalar(scalar_text(other)),
    }
}

/// Text of a JSON value, without quotes for strings
fn scalar_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
