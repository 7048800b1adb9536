//! Label encoding for string categories.
//!
//! Maps string labels to integer indices (0, 1, 2, ...).

use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Label encoder for string categories.
///
/// Learns the set of distinct labels, sorts it, and encodes each label as its
/// index in the sorted set. Labels not seen during fit are rejected.
///
/// # Example
/// ```
/// use mailfeat::preprocessing::LabelEncoder;
///
/// let fitted = LabelEncoder::new().fit(["other", "alice", "bob", "alice"]).unwrap();
///
/// assert_eq!(fitted.classes(), &["alice", "bob", "other"]);
/// assert_eq!(fitted.transform(["bob", "other"]).unwrap(), vec![1, 2]);
/// assert!(fitted.transform_one("carol").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct LabelEncoder;

impl LabelEncoder {
    /// Create a new LabelEncoder.
    pub fn new() -> Self {
        Self
    }

    /// Fit the encoder to the labels and return the fitted encoder.
    pub fn fit<I, S>(&self, labels: I) -> Result<FittedLabelEncoder, PreprocessingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes_set: BTreeSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();

        if classes_set.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit LabelEncoder on empty data".to_string(),
            ));
        }

        Ok(FittedLabelEncoder::from_sorted(
            classes_set.into_iter().collect(),
        ))
    }

    /// Fit and transform in one step.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        labels: &[S],
    ) -> Result<Vec<usize>, PreprocessingError> {
        let fitted = self.fit(labels)?;
        fitted.transform(labels)
    }
}

/// Serializable parameters for a fitted LabelEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoderParams {
    /// Unique classes in sorted order.
    pub classes_: Vec<String>,
}

/// Fitted LabelEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedLabelEncoder {
    /// Unique classes in sorted order.
    classes_: Vec<String>,
    /// Mapping from class to index.
    class_to_idx: HashMap<String, usize>,
}

impl FittedLabelEncoder {
    fn from_sorted(classes_: Vec<String>) -> Self {
        let class_to_idx = classes_
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.clone(), idx))
            .collect();
        Self {
            classes_,
            class_to_idx,
        }
    }

    /// Get the unique classes.
    pub fn classes(&self) -> &[String] {
        &self.classes_
    }

    /// Get the number of classes.
    pub fn n_classes(&self) -> usize {
        self.classes_.len()
    }

    /// Whether `label` was seen during fit.
    pub fn contains(&self, label: &str) -> bool {
        self.class_to_idx.contains_key(label)
    }

    /// Encode one label.
    pub fn transform_one(&self, label: &str) -> Result<usize, PreprocessingError> {
        self.class_to_idx
            .get(label)
            .copied()
            .ok_or_else(|| PreprocessingError::UnseenCategory(label.to_string()))
    }

    /// Encode labels, failing on the first unseen one.
    pub fn transform<I, S>(&self, labels: I) -> Result<Vec<usize>, PreprocessingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|label| self.transform_one(label.as_ref()))
            .collect()
    }

    /// Inverse transform encoded indices back to labels.
    pub fn inverse_transform(&self, indices: &[usize]) -> Result<Vec<&str>, PreprocessingError> {
        indices
            .iter()
            .map(|&idx| {
                self.classes_
                    .get(idx)
                    .map(String::as_str)
                    .ok_or_else(|| {
                        PreprocessingError::InvalidParameter(format!(
                            "Index {} out of bounds (n_classes {})",
                            idx,
                            self.classes_.len()
                        ))
                    })
            })
            .collect()
    }

    /// Extract parameters for serialization.
    pub fn extract_params(&self) -> LabelEncoderParams {
        LabelEncoderParams {
            classes_: self.classes_.clone(),
        }
    }

    /// Reconstruct from parameters.
    ///
    /// Classes must be non-empty, strictly increasing and therefore unique.
    pub fn from_params(params: LabelEncoderParams) -> Result<Self, PreprocessingError> {
        if params.classes_.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "LabelEncoder params have no classes".to_string(),
            ));
        }
        if params.classes_.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(PreprocessingError::InvalidParameter(
                "LabelEncoder classes must be sorted and unique".to_string(),
            ));
        }
        Ok(Self::from_sorted(params.classes_))
    }

    /// Save to file.
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        let params = self.extract_params();
        let bytes = params.to_bytes().map_err(std::io::Error::other)?;
        std::fs::write(path, bytes)
    }

    /// Load from file.
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError> {
        let bytes = std::fs::read(path)?;
        let params = LabelEncoderParams::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_encoder_basic() {
        let labels = ["other", "alice", "bob", "alice"];

        let fitted = LabelEncoder::new().fit(labels).unwrap();

        assert_eq!(fitted.n_classes(), 3);
        assert_eq!(fitted.classes(), &["alice", "bob", "other"]);

        let encoded = fitted.transform(labels).unwrap();
        assert_eq!(encoded, vec![2, 0, 1, 0]);
    }

    #[test]
    fn test_label_encoder_sorts_lexicographically() {
        let fitted = LabelEncoder::new().fit(["z", "", "m-n", "a"]).unwrap();
        assert_eq!(fitted.classes(), &["", "a", "m-n", "z"]);
        assert_eq!(fitted.transform_one("").unwrap(), 0);
    }

    #[test]
    fn test_label_encoder_inverse() {
        let labels = ["carol", "alice", "bob"];
        let fitted = LabelEncoder::new().fit(labels).unwrap();

        let encoded = fitted.transform(labels).unwrap();
        let recovered = fitted.inverse_transform(&encoded).unwrap();
        assert_eq!(recovered, labels);

        assert!(fitted.inverse_transform(&[3]).is_err());
    }

    #[test]
    fn test_label_encoder_unknown_error() {
        let fitted = LabelEncoder::new().fit(["alice", "other"]).unwrap();

        let err = fitted.transform(["alice", "none"]).unwrap_err();
        assert!(matches!(err, PreprocessingError::UnseenCategory(label) if label == "none"));
        assert!(!fitted.contains("none"));
    }

    #[test]
    fn test_label_encoder_fit_transform() {
        let encoded = LabelEncoder::new().fit_transform(&["b", "a", "b"]).unwrap();
        assert_eq!(encoded, vec![1, 0, 1]);
    }

    #[test]
    fn test_label_encoder_serialization() {
        let labels = ["other", "alice", "bob"];
        let fitted = LabelEncoder::new().fit(labels).unwrap();

        let temp_file = std::env::temp_dir().join("mailfeat_test_label.bin");
        fitted.save_to_file(&temp_file).unwrap();

        let loaded = FittedLabelEncoder::load_from_file(&temp_file).unwrap();

        assert_eq!(loaded.classes(), fitted.classes());
        assert_eq!(
            loaded.transform(labels).unwrap(),
            fitted.transform(labels).unwrap()
        );

        std::fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_label_encoder_from_params_validation() {
        let unsorted = LabelEncoderParams {
            classes_: vec!["b".to_string(), "a".to_string()],
        };
        assert!(FittedLabelEncoder::from_params(unsorted).is_err());

        let duplicated = LabelEncoderParams {
            classes_: vec!["a".to_string(), "a".to_string()],
        };
        assert!(FittedLabelEncoder::from_params(duplicated).is_err());

        let empty = LabelEncoderParams { classes_: vec![] };
        assert!(FittedLabelEncoder::from_params(empty).is_err());
    }

    #[test]
    fn test_label_encoder_empty_data() {
        let result = LabelEncoder::new().fit(Vec::<String>::new());
        assert!(matches!(result, Err(PreprocessingError::EmptyData(_))));
    }
}
