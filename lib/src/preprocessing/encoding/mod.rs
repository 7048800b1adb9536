//! Categorical encoding of string labels.
//!
//! # Available Encoders
//!
//! ## LabelEncoder
//! Maps each distinct label to its index in the sorted set of labels seen
//! during fit.
//!
//! ```ignore
//! // Fit on: ["other", "alice", "bob"]
//! // Classes: ["alice", "bob", "other"]
//! // "bob" -> 1, "other" -> 2, "carol" -> UnseenCategory
//! ```

mod label;

pub use label::{FittedLabelEncoder, LabelEncoder, LabelEncoderParams};
