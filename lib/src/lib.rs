//! # mailfeat
//!
//! Fit/transform encoders that turn the sender and receiver addresses of
//! emails into bounded-cardinality categorical codes for a downstream
//! classifier.
//!
//! ## Core Design Principles
//!
//! - **Fit/Transform Separation**: Unfitted encoders carry only configuration;
//!   fitting returns a separate, immutable fitted encoder.
//! - **Dual Input Shapes**: Every fitted encoder transforms a single record or
//!   a whole table, with identical per-record results.
//! - **Bounded Vocabulary**: Only the top-N most frequent values keep their own
//!   code; everything else shares the catch-all code.
//! - **Recoverable Extraction**: A malformed address field never aborts a
//!   batch; it is mapped to a sentinel value instead.
//!
//! ## Quick Start
//!
//! ```rust
//! use mailfeat::dataset::RecordSource;
//! use mailfeat::preprocessing::{FittedTransformer, ReceiverEncoder, Transformer};
//! use serde_json::json;
//!
//! let train = RecordSource::try_from(json!([
//!     {"to": ["p@x.com", "q@x.com"]},
//!     {"to": ["p@x.com"]},
//! ]))
//! .unwrap();
//!
//! let fitted = ReceiverEncoder::new().with_top_n(1).fit(&train).unwrap();
//! assert_eq!(fitted.top_values(), &["p"]);
//!
//! let email = RecordSource::try_from(json!({"to": ["q@x.com"]})).unwrap();
//! let encoded = fitted.transform(email).unwrap().into_single().unwrap();
//! assert_eq!(encoded["receivers"], json!([fitted.catch_all_code()]));
//! ```
//!
//! ## Module Structure
//!
//! - `dataset` — Records, tables and single/table dispatch
//! - `preprocessing` — Address extraction, top-N reduction, label encoding and
//!   the sender/receiver encoders
//! - `serialization` — Parameter persistence

/// Records, tables and dual-mode dispatch.
pub mod dataset;

/// Email metadata preprocessing transformers.
pub mod preprocessing;

/// Fitted parameter persistence.
pub mod serialization;

pub use dataset::{Applied, Record, RecordSource, Table};
pub use preprocessing::{
    FittedReceiverEncoder, FittedSenderEncoder, FittedTransformer, PreprocessingError,
    ReceiverEncoder, SenderEncoder, Transformer,
};
