//! Sender encoder.
//!
//! Turns the `from` address of each email into one integer code:
//!
//! ```text
//! "john.doe@example.com" -> "john-doe" -> top-N or "other" -> label code
//! ```
//!
//! # Example
//! ```
//! use mailfeat::dataset::RecordSource;
//! use mailfeat::preprocessing::{FittedTransformer, SenderEncoder, Transformer};
//! use serde_json::json;
//!
//! let train = RecordSource::try_from(json!([
//!     {"from": "a@x.com"},
//!     {"from": "a@x.com"},
//!     {"from": "b@x.com"},
//! ]))
//! .unwrap();
//!
//! let fitted = SenderEncoder::new().with_top_n(1).fit(&train).unwrap();
//! assert_eq!(fitted.top_values(), &["a"]);
//!
//! let email = RecordSource::try_from(json!({"from": "c@x.com"})).unwrap();
//! let encoded = fitted.transform(email).unwrap().into_single().unwrap();
//! assert_eq!(encoded["sender"], json!(fitted.catch_all_code()));
//! ```

use crate::dataset::{Record, RecordSource};
use crate::preprocessing::address::get_sender;
use crate::preprocessing::encoding::{FittedLabelEncoder, LabelEncoder, LabelEncoderParams};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::preprocessing::vocabulary::{rank_and_select, TieBreak, TopValues, CATCH_ALL};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::iter;
use tracing::{debug, warn};

use super::{catch_all_code, validate_top_n};

/// Encoded sender field written by [`FittedSenderEncoder::transform`].
pub const SENDER_FIELD: &str = "sender";

/// Configuration for SenderEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderEncoderConfig {
    /// Number of most frequent senders kept as their own category.
    pub top_n: usize,
    /// Ordering among equally frequent senders at the top-N cut.
    pub tie_break: TieBreak,
}

impl Default for SenderEncoderConfig {
    fn default() -> Self {
        Self {
            top_n: 100,
            tie_break: TieBreak::default(),
        }
    }
}

/// Serializable parameters for a fitted SenderEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SenderEncoderParams {
    /// Configuration options.
    pub config: SenderEncoderConfig,
    /// Senders kept at fit time, most frequent first.
    pub top_values: Vec<String>,
    /// Label encoder over the reduced senders.
    pub encoder: LabelEncoderParams,
}

/// SenderEncoder transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct SenderEncoder {
    config: SenderEncoderConfig,
}

impl SenderEncoder {
    /// Create a new SenderEncoder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a SenderEncoder from a configuration.
    pub fn with_config(config: SenderEncoderConfig) -> Self {
        Self { config }
    }

    /// Set the number of senders kept as their own category.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.config.top_n = top_n;
        self
    }

    /// Set the tie-break used at the top-N cut.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.config.tie_break = tie_break;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &SenderEncoderConfig {
        &self.config
    }
}

impl Transformer for SenderEncoder {
    type Input = RecordSource;
    type Output = RecordSource;
    type Params = SenderEncoderParams;
    type Fitted = FittedSenderEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        validate_top_n(self.config.top_n)?;
        let table = data.as_table()?;
        if table.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit SenderEncoder on empty data".to_string(),
            ));
        }

        let senders = data.apply(get_sender).into_vec();
        if senders.iter().all(String::is_empty) {
            warn!(rows = table.len(), "no sender could be extracted from the fit data");
        }

        let top_values = TopValues::new(rank_and_select(
            senders.iter().map(String::as_str),
            self.config.top_n,
            self.config.tie_break,
        ));

        // "other" is always encodable, even when every sender made the cut.
        let reduced = senders.iter().map(|sender| top_values.reduce(sender));
        let encoder = LabelEncoder::new().fit(reduced.chain(iter::once(CATCH_ALL)))?;

        debug!(
            rows = table.len(),
            top_n = self.config.top_n,
            retained = top_values.len(),
            n_classes = encoder.n_classes(),
            "fitted sender encoder"
        );

        FittedSenderEncoder::new(self.config.clone(), top_values, encoder)
    }
}

/// Fitted SenderEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedSenderEncoder {
    config: SenderEncoderConfig,
    top_values: TopValues,
    encoder: FittedLabelEncoder,
    catch_all_code: usize,
}

impl FittedSenderEncoder {
    fn new(
        config: SenderEncoderConfig,
        top_values: TopValues,
        encoder: FittedLabelEncoder,
    ) -> Result<Self, PreprocessingError> {
        let catch_all_code = catch_all_code(&encoder)?;
        Ok(Self {
            config,
            top_values,
            encoder,
            catch_all_code,
        })
    }

    /// Configuration used at fit time.
    pub fn config(&self) -> &SenderEncoderConfig {
        &self.config
    }

    /// Senders kept at fit time, most frequent first.
    pub fn top_values(&self) -> &[String] {
        self.top_values.as_slice()
    }

    /// Labels known to the categorical encoder, in code order.
    pub fn classes(&self) -> &[String] {
        self.encoder.classes()
    }

    /// Code of the catch-all category.
    pub fn catch_all_code(&self) -> usize {
        self.catch_all_code
    }

    /// Code for one record.
    pub fn encode_record(&self, record: &Record) -> Result<usize, PreprocessingError> {
        let sender = get_sender(record);
        self.encoder.transform_one(self.top_values.reduce(&sender))
    }

    /// Label behind a code.
    pub fn decode(&self, code: usize) -> Result<&str, PreprocessingError> {
        let labels = self.encoder.inverse_transform(&[code])?;
        Ok(labels[0])
    }
}

impl FittedTransformer for FittedSenderEncoder {
    type Input = RecordSource;
    type Output = RecordSource;
    type Params = SenderEncoderParams;

    fn transform(&self, mut data: Self::Input) -> Result<Self::Output, PreprocessingError> {
        let codes = data.try_apply(|record| self.encode_record(record))?;
        data.assign(SENDER_FIELD, codes.map(Value::from))?;
        Ok(data)
    }

    fn extract_params(&self) -> Self::Params {
        SenderEncoderParams {
            config: self.config.clone(),
            top_values: self.top_values.as_slice().to_vec(),
            encoder: self.encoder.extract_params(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let encoder = FittedLabelEncoder::from_params(params.encoder)?;
        if let Some(missing) = params
            .top_values
            .iter()
            .find(|value| !encoder.contains(value))
        {
            return Err(PreprocessingError::InvalidParameter(format!(
                "retained sender {missing:?} is not a known class"
            )));
        }
        Self::new(params.config, TopValues::new(params.top_values), encoder)
    }

    fn n_classes(&self) -> usize {
        self.encoder.n_classes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Applied;
    use serde_json::json;

    fn source(value: Value) -> RecordSource {
        RecordSource::try_from(value).unwrap()
    }

    fn train_table() -> RecordSource {
        source(json!([
            {"from": "a@x.com"},
            {"from": "a@x.com"},
            {"from": "b@x.com"}
        ]))
    }

    #[test]
    fn test_sender_encoder_fit_top_values() {
        let fitted = SenderEncoder::new().with_top_n(1).fit(&train_table()).unwrap();

        assert_eq!(fitted.top_values(), &["a"]);
        assert_eq!(fitted.classes(), &["a", "other"]);
        assert_eq!(fitted.n_classes(), 2);
        assert_eq!(fitted.catch_all_code(), 1);
    }

    #[test]
    fn test_sender_encoder_unseen_maps_to_catch_all() {
        let fitted = SenderEncoder::new().with_top_n(1).fit(&train_table()).unwrap();

        let single = fitted.transform(source(json!({"from": "c@x.com"}))).unwrap();
        let record = single.into_single().unwrap();
        assert_eq!(record[SENDER_FIELD], json!(fitted.catch_all_code()));
    }

    #[test]
    fn test_sender_encoder_catch_all_when_all_retained() {
        let fitted = SenderEncoder::new().fit(&train_table()).unwrap();

        assert_eq!(fitted.top_values(), &["a", "b"]);
        assert_eq!(fitted.classes(), &["a", "b", "other"]);
        assert_eq!(fitted.decode(fitted.catch_all_code()).unwrap(), CATCH_ALL);
    }

    #[test]
    fn test_sender_encoder_transform_table() {
        let fitted = SenderEncoder::new().with_top_n(1).fit(&train_table()).unwrap();

        let table = fitted.transform(train_table()).unwrap().into_table().unwrap();
        assert_eq!(
            table.column(SENDER_FIELD),
            vec![Some(&json!(0)), Some(&json!(0)), Some(&json!(1))]
        );
        // Other fields are kept.
        assert_eq!(table.rows()[2]["from"], json!("b@x.com"));
    }

    #[test]
    fn test_sender_encoder_missing_sender_is_a_category() {
        let train = source(json!([
            {"from": null},
            {},
            {"from": "a@x.com"}
        ]));
        let fitted = SenderEncoder::new().with_top_n(1).fit(&train).unwrap();
        assert_eq!(fitted.top_values(), &[""]);

        let codes = fitted
            .transform(train)
            .unwrap()
            .apply(|record| record[SENDER_FIELD].clone());
        assert_eq!(codes, Applied::Table(vec![json!(0), json!(0), json!(1)]));
    }

    #[test]
    fn test_sender_encoder_fit_rejects_single_record() {
        let result = SenderEncoder::new().fit(&source(json!({"from": "a@x.com"})));
        assert!(matches!(
            result,
            Err(PreprocessingError::InvalidInputKind { expected: "table", .. })
        ));
    }

    #[test]
    fn test_sender_encoder_fit_rejects_empty_table_and_zero_top_n() {
        let empty = source(json!([]));
        assert!(matches!(
            SenderEncoder::new().fit(&empty),
            Err(PreprocessingError::EmptyData(_))
        ));
        assert!(matches!(
            SenderEncoder::new().with_top_n(0).fit(&train_table()),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_sender_encoder_tie_break() {
        let train = source(json!([
            {"from": "zed@x.com"},
            {"from": "amy@x.com"}
        ]));
        let first_seen = SenderEncoder::new().with_top_n(1).fit(&train).unwrap();
        assert_eq!(first_seen.top_values(), &["zed"]);

        let lexicographic = SenderEncoder::new()
            .with_top_n(1)
            .with_tie_break(TieBreak::Lexicographic)
            .fit(&train)
            .unwrap();
        assert_eq!(lexicographic.top_values(), &["amy"]);
    }

    #[test]
    fn test_sender_encoder_fit_transform() {
        let out = SenderEncoder::new()
            .with_top_n(1)
            .fit_transform(train_table())
            .unwrap();
        assert_eq!(out.n_records(), 3);
    }

    #[test]
    fn test_sender_encoder_serialization() {
        let fitted = SenderEncoder::new().with_top_n(1).fit(&train_table()).unwrap();

        let temp_file = std::env::temp_dir().join("mailfeat_test_sender.bin");
        fitted.save_to_file(&temp_file).unwrap();
        let loaded = FittedSenderEncoder::load_from_file(&temp_file).unwrap();

        assert_eq!(loaded.extract_params(), fitted.extract_params());
        assert_eq!(
            loaded.transform(train_table()).unwrap(),
            fitted.transform(train_table()).unwrap()
        );

        std::fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_sender_encoder_from_params_validation() {
        let fitted = SenderEncoder::new().with_top_n(1).fit(&train_table()).unwrap();

        let mut params = fitted.extract_params();
        params.top_values.push("ghost".to_string());
        assert!(FittedSenderEncoder::from_params(params).is_err());

        let mut params = fitted.extract_params();
        params.encoder.classes_ = vec!["a".to_string()];
        assert!(matches!(
            FittedSenderEncoder::from_params(params),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_sender_config_deserializes_with_defaults() {
        let config: SenderEncoderConfig = serde_json::from_value(json!({"top_n": 5})).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.tie_break, TieBreak::FirstSeen);

        let config: SenderEncoderConfig =
            serde_json::from_value(json!({"tie_break": "Lexicographic"})).unwrap();
        assert_eq!(config.top_n, 100);
    }
}
