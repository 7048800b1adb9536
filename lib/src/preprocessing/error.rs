//! Error types for preprocessing operations.

use thiserror::Error;

/// Error type for preprocessing operations.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// `fit` was called on a single record instead of a table.
    #[error("Invalid input kind: expected {expected}, got {got}")]
    InvalidInputKind {
        expected: &'static str,
        got: &'static str,
    },
    /// A label was not part of the vocabulary learned during fit.
    #[error("Unseen category: {0:?} was not present during fit")]
    UnseenCategory(String),
    /// Invalid hyperparameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(String),
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
}

impl From<std::io::Error> for PreprocessingError {
    fn from(err: std::io::Error) -> Self {
        PreprocessingError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

/// Reasons an address field could not be read from a record.
///
/// These never reach callers of `fit`/`transform`: extraction maps every
/// variant to a sentinel value so one malformed record cannot abort a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// The field is absent, null or empty.
    #[error("field `{0}` is missing or empty")]
    MissingField(&'static str),
    /// The field (or a list element) has a non-string JSON type.
    #[error("field `{0}` is not a string")]
    NotAString(&'static str),
    /// A textual receiver list could not be parsed.
    #[error("cannot parse address list: {0}")]
    UnparseableList(String),
}
