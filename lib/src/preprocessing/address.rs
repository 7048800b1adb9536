//! Address field extraction.
//!
//! Reads the raw `from` and `to` fields of a record and normalizes every
//! address to its local part, with `.` replaced by `-`:
//!
//! ```text
//! "john.doe@example.com" -> "john-doe"
//! ```
//!
//! The `parse_*` functions report why a field could not be read. The `get_*`
//! functions are what the encoders use: they fold every [`ExtractionError`]
//! into the field's sentinel (an empty sender, an empty receiver list).

use crate::dataset::Record;
use crate::preprocessing::error::ExtractionError;
use serde_json::Value;
use tracing::trace;

/// Raw sender field.
pub const FROM_FIELD: &str = "from";
/// Raw receivers field.
pub const TO_FIELD: &str = "to";

/// Local part of `address` (text before the first `@`), dots replaced by dashes.
///
/// An address without `@` is returned whole.
pub fn normalize_local_part(address: &str) -> String {
    let local = address
        .split_once('@')
        .map_or(address, |(local, _domain)| local);
    local.replace('.', "-")
}

/// Normalized sender of `record`.
pub fn parse_sender(record: &Record) -> Result<String, ExtractionError> {
    match record.get(FROM_FIELD) {
        None | Some(Value::Null) => Err(ExtractionError::MissingField(FROM_FIELD)),
        Some(Value::String(address)) if address.is_empty() => {
            Err(ExtractionError::MissingField(FROM_FIELD))
        }
        Some(Value::String(address)) => Ok(normalize_local_part(address)),
        Some(_) => Err(ExtractionError::NotAString(FROM_FIELD)),
    }
}

/// Normalized sender of `record`, or `""` if it cannot be read.
pub fn get_sender(record: &Record) -> String {
    parse_sender(record).unwrap_or_else(|err| {
        trace!(%err, "sender extraction failed");
        String::new()
    })
}

/// Normalized receivers of `record`, in field order.
///
/// The `to` field may be a JSON array of strings or a textual list literal
/// (see [`parse_address_list`]).
pub fn parse_receivers(record: &Record) -> Result<Vec<String>, ExtractionError> {
    match record.get(TO_FIELD) {
        None | Some(Value::Null) => Err(ExtractionError::MissingField(TO_FIELD)),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(normalize_local_part)
                    .ok_or(ExtractionError::NotAString(TO_FIELD))
            })
            .collect(),
        Some(Value::String(text)) => Ok(parse_address_list(text)?
            .iter()
            .map(|address| normalize_local_part(address))
            .collect()),
        Some(_) => Err(ExtractionError::NotAString(TO_FIELD)),
    }
}

/// Normalized receivers of `record`, or an empty list if they cannot be read.
pub fn get_receivers(record: &Record) -> Vec<String> {
    parse_receivers(record).unwrap_or_else(|err| {
        trace!(%err, "receivers extraction failed");
        Vec::new()
    })
}

/// Parse a serialized address list.
///
/// Accepts a JSON array of strings, or a bracketed (or parenthesized) list of
/// single- or double-quoted strings as written by Python's `repr`:
///
/// ```
/// use mailfeat::preprocessing::address::parse_address_list;
///
/// assert_eq!(
///     parse_address_list("['a@x.com', \"b@x.com\"]").unwrap(),
///     vec!["a@x.com", "b@x.com"]
/// );
/// assert!(parse_address_list("a@x.com").is_err());
/// ```
pub fn parse_address_list(text: &str) -> Result<Vec<String>, ExtractionError> {
    let text = text.trim();
    if let Ok(list) = serde_json::from_str::<Vec<String>>(text) {
        return Ok(list);
    }

    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .or_else(|| {
            text.strip_prefix('(')
                .and_then(|rest| rest.strip_suffix(')'))
        })
        .ok_or_else(|| {
            ExtractionError::UnparseableList(format!("expected a list literal, got {text:?}"))
        })?;

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let quote = match chars.next() {
            None => break,
            Some(quote @ ('\'' | '"')) => quote,
            Some(other) => {
                return Err(ExtractionError::UnparseableList(format!(
                    "unexpected character {other:?}"
                )))
            }
        };

        let mut item = String::new();
        loop {
            match chars.next() {
                None => {
                    return Err(ExtractionError::UnparseableList(
                        "unterminated string".to_string(),
                    ))
                }
                // Escapes keep the escaped character verbatim.
                Some('\\') => match chars.next() {
                    Some(escaped) => item.push(escaped),
                    None => {
                        return Err(ExtractionError::UnparseableList(
                            "dangling escape".to_string(),
                        ))
                    }
                },
                Some(c) if c == quote => break,
                Some(c) => item.push(c),
            }
        }
        items.push(item);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(other) => {
                return Err(ExtractionError::UnparseableList(format!(
                    "expected ',' between items, got {other:?}"
                )))
            }
        }
    }
    Ok(items)
}
