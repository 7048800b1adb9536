//! Dual-mode dispatch over a single record or a whole table.

use super::{Record, Table};
use crate::preprocessing::error::PreprocessingError;
use serde_json::Value;

/// Input accepted by the encoders: one record, or a table of records.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordSource {
    /// A single record, e.g. one email arriving at inference time.
    Single(Record),
    /// Many records, e.g. a training set.
    Table(Table),
}

/// Per-record results, shaped like the [`RecordSource`] that produced them.
#[derive(Clone, Debug, PartialEq)]
pub enum Applied<T> {
    /// Result for a single record.
    Single(T),
    /// One result per table row, in row order.
    Table(Vec<T>),
}

impl RecordSource {
    /// Human-readable name of the input shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordSource::Single(_) => "single record",
            RecordSource::Table(_) => "table",
        }
    }

    /// Number of records held.
    pub fn n_records(&self) -> usize {
        match self {
            RecordSource::Single(_) => 1,
            RecordSource::Table(table) => table.len(),
        }
    }

    /// Borrow the table, failing for a single record.
    ///
    /// Fitting computes statistics across rows, so it only accepts tables.
    pub fn as_table(&self) -> Result<&Table, PreprocessingError> {
        match self {
            RecordSource::Table(table) => Ok(table),
            RecordSource::Single(_) => Err(PreprocessingError::InvalidInputKind {
                expected: "table",
                got: self.kind(),
            }),
        }
    }

    /// Apply `f` once for a single record, or to every row of a table.
    ///
    /// Extra arguments are captured by the closure.
    pub fn apply<T, F>(&self, mut f: F) -> Applied<T>
    where
        F: FnMut(&Record) -> T,
    {
        match self {
            RecordSource::Single(record) => Applied::Single(f(record)),
            RecordSource::Table(table) => Applied::Table(table.rows().iter().map(f).collect()),
        }
    }

    /// Like [`apply`](Self::apply) but stops at the first error.
    pub fn try_apply<T, E, F>(&self, f: F) -> Result<Applied<T>, E>
    where
        F: FnMut(&Record) -> Result<T, E>,
    {
        self.apply(f).transpose()
    }

    /// Write `values` into `field`, replacing whatever was there.
    ///
    /// The shape of `values` must match the shape of the source.
    pub fn assign(&mut self, field: &str, values: Applied<Value>) -> Result<(), PreprocessingError> {
        match (self, values) {
            (RecordSource::Single(record), Applied::Single(value)) => {
                record.insert(field.to_string(), value);
                Ok(())
            }
            (RecordSource::Table(table), Applied::Table(column)) => {
                if column.len() != table.len() {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "column `{}` has {} values for {} rows",
                        field,
                        column.len(),
                        table.len()
                    )));
                }
                for (row, value) in table.rows_mut().iter_mut().zip(column) {
                    row.insert(field.to_string(), value);
                }
                Ok(())
            }
            (source, values) => Err(PreprocessingError::InvalidInputKind {
                expected: source.kind(),
                got: values.kind(),
            }),
        }
    }

    /// Unwrap a single record.
    pub fn into_single(self) -> Option<Record> {
        match self {
            RecordSource::Single(record) => Some(record),
            RecordSource::Table(_) => None,
        }
    }

    /// Unwrap a table.
    pub fn into_table(self) -> Option<Table> {
        match self {
            RecordSource::Table(table) => Some(table),
            RecordSource::Single(_) => None,
        }
    }
}

impl From<Record> for RecordSource {
    fn from(record: Record) -> Self {
        RecordSource::Single(record)
    }
}

impl From<Table> for RecordSource {
    fn from(table: Table) -> Self {
        RecordSource::Table(table)
    }
}

/// A JSON object becomes a single record, an array of objects a table.
impl TryFrom<Value> for RecordSource {
    type Error = PreprocessingError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(record) => Ok(RecordSource::Single(record)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Ok(record),
                    other => Err(PreprocessingError::InvalidInputKind {
                        expected: "object row",
                        got: json_kind(&other),
                    }),
                })
                .collect::<Result<Table, _>>()
                .map(RecordSource::Table),
            other => Err(PreprocessingError::InvalidInputKind {
                expected: "object or array of objects",
                got: json_kind(&other),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<T> Applied<T> {
    fn kind(&self) -> &'static str {
        match self {
            Applied::Single(_) => "single record",
            Applied::Table(_) => "table",
        }
    }

    /// Map every result, keeping the shape.
    pub fn map<U, F>(self, mut f: F) -> Applied<U>
    where
        F: FnMut(T) -> U,
    {
        match self {
            Applied::Single(value) => Applied::Single(f(value)),
            Applied::Table(values) => Applied::Table(values.into_iter().map(f).collect()),
        }
    }

    /// Flatten into a vector (length 1 for a single record).
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Applied::Single(value) => vec![value],
            Applied::Table(values) => values,
        }
    }
}

impl<T, E> Applied<Result<T, E>> {
    /// Turn per-record results into a result of per-record values.
    pub fn transpose(self) -> Result<Applied<T>, E> {
        match self {
            Applied::Single(result) => result.map(Applied::Single),
            Applied::Table(results) => results
                .into_iter()
                .collect::<Result<Vec<_>, E>>()
                .map(Applied::Table),
        }
    }
}
