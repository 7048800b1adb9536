//! Email metadata encoders.
//!
//! Both encoders follow the same three steps at fit time:
//!
//! 1. extract a normalized local part from every record's address field,
//! 2. rank the values by frequency and keep the top N,
//! 3. fit a [`LabelEncoder`](crate::preprocessing::LabelEncoder) on the
//!    reduced values plus the catch-all token.
//!
//! | Encoder | Reads | Writes |
//! |---------|-------|--------|
//! | [`SenderEncoder`] | `from` | `sender`: one code |
//! | [`ReceiverEncoder`] | `to` | `receivers`: list of codes |

mod receivers;
mod sender;

pub use receivers::{
    FittedReceiverEncoder, ReceiverEncoder, ReceiverEncoderConfig, ReceiverEncoderParams,
    RECEIVERS_FIELD,
};
pub use sender::{
    FittedSenderEncoder, SenderEncoder, SenderEncoderConfig, SenderEncoderParams, SENDER_FIELD,
};

use crate::preprocessing::encoding::FittedLabelEncoder;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::vocabulary::CATCH_ALL;

fn validate_top_n(top_n: usize) -> Result<(), PreprocessingError> {
    if top_n == 0 {
        return Err(PreprocessingError::InvalidParameter(
            "top_n must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn catch_all_code(encoder: &FittedLabelEncoder) -> Result<usize, PreprocessingError> {
    encoder.transform_one(CATCH_ALL).map_err(|_| {
        PreprocessingError::InvalidParameter(format!(
            "categorical encoder has no {CATCH_ALL:?} class"
        ))
    })
}
