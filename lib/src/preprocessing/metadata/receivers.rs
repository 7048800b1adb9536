//! Receivers encoder.
//!
//! Turns the `to` field of each email into a list of integer codes, one per
//! receiver. Receivers outside the top N become `"other"`; an email without
//! receivers becomes `["none"]`.
//!
//! By default `"none"` is only encodable if some fit record had no
//! receivers. Transforming an empty `to` field otherwise fails with
//! [`PreprocessingError::UnseenCategory`]. Set
//! [`ReceiverEncoder::always_encode_none`] to add `"none"` to the vocabulary
//! unconditionally.

use crate::dataset::{Record, RecordSource};
use crate::preprocessing::address::get_receivers;
use crate::preprocessing::encoding::{FittedLabelEncoder, LabelEncoder, LabelEncoderParams};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::preprocessing::vocabulary::{
    rank_and_select, TieBreak, TopValues, CATCH_ALL, NO_RECEIVER,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{catch_all_code, validate_top_n};

/// Encoded receivers field written by [`FittedReceiverEncoder::transform`].
pub const RECEIVERS_FIELD: &str = "receivers";

/// Configuration for ReceiverEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverEncoderConfig {
    /// Number of most frequent receivers kept as their own category.
    pub top_n: usize,
    /// Ordering among equally frequent receivers at the top-N cut.
    pub tie_break: TieBreak,
    /// Add `"none"` to the vocabulary even if no fit record lacked receivers.
    pub always_encode_none: bool,
}

impl Default for ReceiverEncoderConfig {
    fn default() -> Self {
        Self {
            top_n: 100,
            tie_break: TieBreak::default(),
            always_encode_none: false,
        }
    }
}

/// Serializable parameters for a fitted ReceiverEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceiverEncoderParams {
    /// Configuration options.
    pub config: ReceiverEncoderConfig,
    /// Receivers kept at fit time, most frequent first.
    pub top_values: Vec<String>,
    /// Label encoder over the reduced receivers.
    pub encoder: LabelEncoderParams,
}

/// ReceiverEncoder transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct ReceiverEncoder {
    config: ReceiverEncoderConfig,
}

impl ReceiverEncoder {
    /// Create a new ReceiverEncoder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ReceiverEncoder from a configuration.
    pub fn with_config(config: ReceiverEncoderConfig) -> Self {
        Self { config }
    }

    /// Set the number of receivers kept as their own category.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.config.top_n = top_n;
        self
    }

    /// Set the tie-break used at the top-N cut.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.config.tie_break = tie_break;
        self
    }

    /// Set whether `"none"` is always part of the vocabulary.
    pub fn always_encode_none(mut self, always: bool) -> Self {
        self.config.always_encode_none = always;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &ReceiverEncoderConfig {
        &self.config
    }
}

/// Reduce one record's receivers against the retained vocabulary.
fn reduce_receivers<'a>(top_values: &'a TopValues, receivers: &'a [String]) -> Vec<&'a str> {
    if receivers.is_empty() {
        return vec![NO_RECEIVER];
    }
    receivers
        .iter()
        .map(|receiver| top_values.reduce(receiver))
        .collect()
}

impl Transformer for ReceiverEncoder {
    type Input = RecordSource;
    type Output = RecordSource;
    type Params = ReceiverEncoderParams;
    type Fitted = FittedReceiverEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        validate_top_n(self.config.top_n)?;
        let table = data.as_table()?;
        if table.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit ReceiverEncoder on empty data".to_string(),
            ));
        }

        let receivers = data.apply(get_receivers).into_vec();
        let n_empty = receivers.iter().filter(|list| list.is_empty()).count();
        if n_empty == receivers.len() {
            warn!(rows = table.len(), "no receivers could be extracted from the fit data");
        }

        // Frequencies count every occurrence, not every record.
        let top_values = TopValues::new(rank_and_select(
            receivers.iter().flatten().map(String::as_str),
            self.config.top_n,
            self.config.tie_break,
        ));

        let reduced: Vec<Vec<&str>> = receivers
            .iter()
            .map(|list| reduce_receivers(&top_values, list))
            .collect();
        let extra: &[&str] = if self.config.always_encode_none {
            &[CATCH_ALL, NO_RECEIVER]
        } else {
            &[CATCH_ALL]
        };
        let encoder = LabelEncoder::new().fit(
            reduced
                .iter()
                .flatten()
                .copied()
                .chain(extra.iter().copied()),
        )?;

        debug!(
            rows = table.len(),
            empty_rows = n_empty,
            top_n = self.config.top_n,
            retained = top_values.len(),
            n_classes = encoder.n_classes(),
            none_encodable = encoder.contains(NO_RECEIVER),
            "fitted receivers encoder"
        );

        FittedReceiverEncoder::new(self.config.clone(), top_values, encoder)
    }
}

/// Fitted ReceiverEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedReceiverEncoder {
    config: ReceiverEncoderConfig,
    top_values: TopValues,
    encoder: FittedLabelEncoder,
    catch_all_code: usize,
}

impl FittedReceiverEncoder {
    fn new(
        config: ReceiverEncoderConfig,
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
    pub fn config(&self) -> &ReceiverEncoderConfig {
        &self.config
    }

    /// Receivers kept at fit time, most frequent first.
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

    /// Code of the no-receiver category, if it was fitted.
    pub fn none_code(&self) -> Option<usize> {
        self.encoder.transform_one(NO_RECEIVER).ok()
    }

    /// Codes for one record.
    pub fn encode_record(&self, record: &Record) -> Result<Vec<usize>, PreprocessingError> {
        let receivers = get_receivers(record);
        self.encoder
            .transform(reduce_receivers(&self.top_values, &receivers))
    }

    /// Labels behind a list of codes.
    pub fn decode(&self, codes: &[usize]) -> Result<Vec<&str>, PreprocessingError> {
        self.encoder.inverse_transform(codes)
    }
}

impl FittedTransformer for FittedReceiverEncoder {
    type Input = RecordSource;
    type Output = RecordSource;
    type Params = ReceiverEncoderParams;

    fn transform(&self, mut data: Self::Input) -> Result<Self::Output, PreprocessingError> {
        let codes = data.try_apply(|record| self.encode_record(record))?;
        data.assign(RECEIVERS_FIELD, codes.map(Value::from))?;
        Ok(data)
    }

    fn extract_params(&self) -> Self::Params {
        ReceiverEncoderParams {
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
                "retained receiver {missing:?} is not a known class"
            )));
        }
        if params.config.always_encode_none && !encoder.contains(NO_RECEIVER) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "always_encode_none is set but {NO_RECEIVER:?} is not a known class"
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
    use serde_json::json;

    fn source(value: Value) -> RecordSource {
        RecordSource::try_from(value).unwrap()
    }

    fn train_table() -> RecordSource {
        source(json!([
            {"to": ["p@x.com", "q@x.com"]},
            {"to": ["p@x.com"]}
        ]))
    }

    fn receivers_of(output: RecordSource) -> Value {
        output.into_single().unwrap()[RECEIVERS_FIELD].clone()
    }

    #[test]
    fn test_receiver_encoder_fit_top_values() {
        let fitted = ReceiverEncoder::new().with_top_n(1).fit(&train_table()).unwrap();

        assert_eq!(fitted.top_values(), &["p"]);
        assert_eq!(fitted.classes(), &["other", "p"]);
        assert_eq!(fitted.catch_all_code(), 0);
        assert_eq!(fitted.none_code(), None);
    }

    #[test]
    fn test_receiver_encoder_unseen_maps_to_catch_all() {
        let fitted = ReceiverEncoder::new().with_top_n(1).fit(&train_table()).unwrap();

        let out = fitted.transform(source(json!({"to": ["q@x.com"]}))).unwrap();
        assert_eq!(receivers_of(out), json!([fitted.catch_all_code()]));
    }

    #[test]
    fn test_receiver_encoder_counts_occurrences_not_records() {
        let train = source(json!([
            {"to": ["amy@x.com", "amy@x.com", "amy@x.com"]},
            {"to": ["bob@x.com"]},
            {"to": ["bob@x.com"]}
        ]));
        let fitted = ReceiverEncoder::new().with_top_n(1).fit(&train).unwrap();
        assert_eq!(fitted.top_values(), &["amy"]);
    }

    #[test]
    fn test_receiver_encoder_transform_table() {
        let fitted = ReceiverEncoder::new().with_top_n(1).fit(&train_table()).unwrap();

        let table = fitted.transform(train_table()).unwrap().into_table().unwrap();
        // classes: ["other", "p"]
        assert_eq!(
            table.column(RECEIVERS_FIELD),
            vec![Some(&json!([1, 0])), Some(&json!([1]))]
        );
    }

    #[test]
    fn test_receiver_encoder_empty_without_none_in_fit_fails() {
        let fitted = ReceiverEncoder::new().with_top_n(1).fit(&train_table()).unwrap();

        for email in [json!({"to": []}), json!({}), json!({"to": null})] {
            let err = fitted.transform(source(email)).unwrap_err();
            assert!(matches!(err, PreprocessingError::UnseenCategory(ref label) if label == NO_RECEIVER));
        }
    }

    #[test]
    fn test_receiver_encoder_empty_table_row_aborts_whole_transform() {
        let fitted = ReceiverEncoder::new().with_top_n(1).fit(&train_table()).unwrap();
        let batch = source(json!([{"to": ["p@x.com"]}, {"to": []}]));
        assert!(fitted.transform(batch).is_err());
    }

    #[test]
    fn test_receiver_encoder_none_seen_at_fit() {
        let train = source(json!([
            {"to": ["p@x.com"]},
            {"to": []}
        ]));
        let fitted = ReceiverEncoder::new().fit(&train).unwrap();
        assert_eq!(fitted.classes(), &["none", "other", "p"]);

        let out = fitted.transform(source(json!({"to": "not a list"}))).unwrap();
        assert_eq!(receivers_of(out), json!([0]));
    }

    #[test]
    fn test_receiver_encoder_always_encode_none() {
        let fitted = ReceiverEncoder::new()
            .with_top_n(1)
            .always_encode_none(true)
            .fit(&train_table())
            .unwrap();
        let none_code = fitted.none_code().unwrap();

        let out = fitted.transform(source(json!({"to": []}))).unwrap();
        assert_eq!(receivers_of(out), json!([none_code]));
        assert_eq!(fitted.decode(&[none_code]).unwrap(), vec![NO_RECEIVER]);
    }

    #[test]
    fn test_receiver_encoder_serialized_to_field() {
        let fitted = ReceiverEncoder::new().with_top_n(1).fit(&train_table()).unwrap();

        let out = fitted
            .transform(source(json!({"to": "['p@x.com', 'z@x.com']"})))
            .unwrap();
        assert_eq!(receivers_of(out), json!([1, 0]));
    }

    #[test]
    fn test_receiver_encoder_fit_rejects_single_record() {
        let result = ReceiverEncoder::new().fit(&source(json!({"to": ["p@x.com"]})));
        assert!(matches!(
            result,
            Err(PreprocessingError::InvalidInputKind { .. })
        ));
    }

    #[test]
    fn test_receiver_encoder_serialization() {
        let fitted = ReceiverEncoder::new()
            .with_top_n(1)
            .always_encode_none(true)
            .fit(&train_table())
            .unwrap();

        let temp_file = std::env::temp_dir().join("mailfeat_test_receivers.bin");
        fitted.save_to_file(&temp_file).unwrap();
        let loaded = FittedReceiverEncoder::load_from_file(&temp_file).unwrap();

        assert_eq!(loaded.extract_params(), fitted.extract_params());
        assert_eq!(loaded.none_code(), fitted.none_code());

        std::fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_receiver_encoder_from_params_rejects_inconsistent_none_flag() {
        let fitted = ReceiverEncoder::new().with_top_n(1).fit(&train_table()).unwrap();
        let mut params = fitted.extract_params();
        params.config.always_encode_none = true;
        assert!(FittedReceiverEncoder::from_params(params).is_err());
    }
}
