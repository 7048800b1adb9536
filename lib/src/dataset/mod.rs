//! Record and table abstractions for email metadata.
//!
//! This module provides the two input shapes every encoder in this crate
//! accepts, plus the dispatch that applies a per-record function to either.
//!
//! # Core Concepts
//!
//! - **Record** — One email as a JSON-like key/value mapping. Encoders read
//!   raw fields such as `from` and `to` and write encoded fields back.
//! - **Table** — An ordered collection of records, one per row.
//! - **RecordSource** — Either a single [`Record`] or a [`Table`]. Encoders
//!   are fitted on tables and can transform both shapes.
//!
//! # Example
//!
//! ```rust
//! use mailfeat::dataset::{RecordSource, Applied};
//! use serde_json::json;
//!
//! let source = RecordSource::try_from(json!([
//!     {"from": "alice@example.com"},
//!     {"from": "bob@example.com"},
//! ]))
//! .unwrap();
//!
//! let lengths = source.apply(|record| record.len());
//! assert_eq!(lengths, Applied::Table(vec![1, 1]));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod source;
pub use self::source::{Applied, RecordSource};

/// A single email record: field name to raw JSON value.
pub type Record = serde_json::Map<String, Value>;

/// An ordered collection of records.
///
/// Row order is significant: every per-row result produced by an encoder is
/// aligned with the order of [`Table::rows`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Record>,
}

impl Table {
    /// Create a table from its rows.
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow the rows.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Append a row.
    pub fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    /// Collect the values of one field, `None` where a row lacks it.
    pub fn column(&self, field: &str) -> Vec<Option<&Value>> {
        self.rows.iter().map(|row| row.get(field)).collect()
    }

    /// Consume the table and return its rows.
    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Record] {
        &mut self.rows
    }
}

impl From<Vec<Record>> for Table {
    fn from(rows: Vec<Record>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Table {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
