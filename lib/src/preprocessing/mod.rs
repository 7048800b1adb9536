//! Email metadata preprocessing transformers.
//!
//! This module turns raw address fields into bounded-cardinality categorical
//! codes, following a fit/transform split.
//!
//! # Design Philosophy
//!
//! - **Fit on tables only**: vocabularies are frequency statistics, so `fit`
//!   rejects a single record
//! - **Dual mode transform**: a single record and a one-row table give the same codes
//! - **Serializable**: fitted encoders can be saved and loaded
//! - **sklearn-compatible**: API familiar to users of scikit-learn
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! ## Metadata
//! - [`SenderEncoder`]: `from` address to one code
//! - [`ReceiverEncoder`]: `to` addresses to a list of codes
//!
//! ## Encoding
//! - [`LabelEncoder`]: string labels to dense integer codes
//!
//! # Example
//!
//! ```ignore
//! use mailfeat::preprocessing::{Transformer, FittedTransformer, SenderEncoder};
//!
//! let fitted = SenderEncoder::new().with_top_n(50).fit(&training_table)?;
//!
//! // Transform one incoming email
//! let encoded = fitted.transform(email)?;
//!
//! // Save for later use
//! fitted.save_to_file("sender.bin")?;
//! let loaded = FittedSenderEncoder::load_from_file("sender.bin")?;
//! ```

pub mod address;
pub mod encoding;
pub mod error;
pub mod metadata;
pub mod traits;
pub mod vocabulary;

// Re-export main types
pub use encoding::{FittedLabelEncoder, LabelEncoder, LabelEncoderParams};
pub use error::{ExtractionError, PreprocessingError};
pub use metadata::{
    FittedReceiverEncoder, FittedSenderEncoder, ReceiverEncoder, ReceiverEncoderConfig,
    ReceiverEncoderParams, SenderEncoder, SenderEncoderConfig, SenderEncoderParams,
    RECEIVERS_FIELD, SENDER_FIELD,
};
pub use traits::{FittedTransformer, Transformer};
pub use vocabulary::{TieBreak, CATCH_ALL, NO_RECEIVER};
