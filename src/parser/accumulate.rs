//! Key/value splitting and attribute accumulation rules.
//!
//! Repeated keys never overwrite: header attributes grow into lists, entry
//! attributes either grow a token list (list keywords) or concatenate.

use crate::config::LegacyQuirks;
use crate::constants::{COMMENT_MARKER, KEY_VALUE_SEPARATOR, QUOTE_MARKER};
use crate::models::AttributeValue;
use indexmap::IndexMap;

/// Split `key: value` on the first colon; a line without a colon is all key
pub fn split_key_value(line: &str) -> (&str, &str) {
    line.split_once(KEY_VALUE_SEPARATOR).unwrap_or((line, ""))
}

/// Keep only the text before the first `!`
pub fn strip_inline_comment(value: &str) -> &str {
    value
        .split_once(COMMENT_MARKER)
        .map_or(value, |(before, _)| before)
}

/// Remove the first and last character of a value that starts with a quote
///
/// The closing quote is assumed, not checked.
pub fn strip_quotes(value: &str) -> &str {
    if !value.starts_with(QUOTE_MARKER) {
        return value;
    }
    let mut chars = value.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Key and value of a header line
pub fn header_key_value(line: &str, quirks: &LegacyQuirks) -> (String, String) {
    let (key, rest) = split_key_value(line);
    let value = if quirks.drop_header_colons {
        let joined = rest.replace(KEY_VALUE_SEPARATOR, "");
        strip_quotes(strip_inline_comment(&joined).trim()).to_string()
    } else {
        strip_quotes(strip_inline_comment(rest).trim()).to_string()
    };
    (key.trim().to_string(), value)
}

/// Key and value of an attribute line inside an entry
pub fn entry_key_value(line: &str) -> (&str, &str) {
    let (key, rest) = split_key_value(line);
    (key.trim(), strip_inline_comment(rest).trim())
}

/// Combine a header attribute with a repeated occurrence
pub fn accumulate_general(existing: Option<AttributeValue>, value: String) -> AttributeValue {
    match existing {
        None => AttributeValue::Scalar(value),
        Some(AttributeValue::Scalar(first)) => AttributeValue::List(vec![first, value]),
        Some(AttributeValue::List(mut values)) => {
            values.push(value);
            AttributeValue::List(values)
        }
    }
}

/// Combine an entry attribute with a repeated occurrence
///
/// List keywords always end up as whitespace-split token lists, even on first
/// assignment. Other keys concatenate with a single space.
pub fn accumulate_entry(
    existing: Option<AttributeValue>,
    value: &str,
    is_list_keyword: bool,
    quirks: &LegacyQuirks,
) -> AttributeValue {
    let combined = match existing {
        None => value.to_string(),
        Some(AttributeValue::Scalar(current)) => format!("{} {}", current, value),
        Some(AttributeValue::List(tokens)) => {
            let current = if quirks.concat_list_without_separator {
                tokens.concat()
            } else {
                tokens.join(" ")
            };
            format!("{} {}", current, value)
        }
    };

    if is_list_keyword {
        AttributeValue::List(combined.split_whitespace().map(str::to_string).collect())
    } else {
        AttributeValue::Scalar(combined)
    }
}

/// Apply an accumulation rule to `key` in place, keeping the key's original position
pub fn merge_into<F>(attributes: &mut IndexMap<String, AttributeValue>, key: &str, rule: F)
where
    F: FnOnce(Option<AttributeValue>) -> AttributeValue,
{
    match attributes.get_mut(key) {
        Some(slot) => {
            let current = std::mem::take(slot);
            *slot = rule(Some(current));
        }
        None => {
            attributes.insert(key.to_string(), rule(None));
        }
    }
}
