//! Linear classifiers
//!
//! Both estimators follow the same shape: a builder-style configuration
//! implementing [`Estimator`](crate::core::Estimator) and an immutable
//! trained model implementing [`Classifier`](crate::core::Classifier).
//! Classes are the sorted unique training labels; binary problems keep a
//! single decision function whose positive side is the second class.

pub mod linear_svc;
pub mod logistic;

pub use self::linear_svc::*;
pub use self::logistic::*;

use crate::core::{ClassifierError, Dataset, Result};
use std::collections::BTreeSet;

/// Sorted class labels and the per-sample class index of a training set
#[derive(Debug, Clone)]
pub(crate) struct EncodedTargets {
    pub classes: Vec<String>,
    pub indices: Vec<usize>,
}

impl EncodedTargets {
    /// Encode dataset labels, requiring at least two distinct classes
    pub fn from_dataset<D: Dataset>(dataset: &D) -> Result<Self> {
        if dataset.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }

        let classes: Vec<String> = (0..dataset.len())
            .map(|i| dataset.label(i))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        if classes.len() < 2 {
            return Err(ClassifierError::InvalidDataset(format!(
                "at least 2 classes are required, found {}",
                classes.len()
            )));
        }

        let indices = (0..dataset.len())
            .map(|i| {
                classes
                    .binary_search_by(|c| c.as_str().cmp(dataset.label(i)))
                    .unwrap_or_default()
            })
            .collect();

        Ok(Self { classes, indices })
    }

    /// +1/-1 targets for a one-vs-rest problem on `class`
    pub fn binary_targets(&self, class: usize) -> Vec<f64> {
        self.indices
            .iter()
            .map(|&k| if k == class { 1.0 } else { -1.0 })
            .collect()
    }
}

/// Shared parameter validation for both estimators
pub(crate) fn validate_params(c: f64, tolerance: f64, max_iterations: usize) -> Result<()> {
    if !(c > 0.0 && c.is_finite()) {
        return Err(ClassifierError::InvalidParameter(format!(
            "C must be positive, got {c}"
        )));
    }
    if !(tolerance > 0.0 && tolerance.is_finite()) {
        return Err(ClassifierError::InvalidParameter(format!(
            "tolerance must be positive, got {tolerance}"
        )));
    }
    if max_iterations == 0 {
        return Err(ClassifierError::InvalidParameter(
            "max_iterations must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Check that a dataset has at least one feature column and only finite values
pub(crate) fn validate_features<D: Dataset>(dataset: &D) -> Result<()> {
    if dataset.dim() == 0 {
        return Err(ClassifierError::InvalidDataset(
            "samples have no features".to_string(),
        ));
    }
    for i in 0..dataset.len() {
        if let Some(j) = dataset.features(i).iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::InvalidDataset(format!(
                "sample {i} has a non-finite value in feature {j}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SplitDataset;

    fn dataset(labels: &[&str]) -> SplitDataset {
        let rows = labels.iter().map(|_| vec![0.0]).collect();
        SplitDataset::from_rows(rows, labels.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_encoded_targets_sorted() {
        let encoded = EncodedTargets::from_dataset(&dataset(&["dog", "cat", "bird", "cat"])).unwrap();
        assert_eq!(encoded.classes, vec!["bird", "cat", "dog"]);
        assert_eq!(encoded.indices, vec![2, 1, 0, 1]);
        assert_eq!(encoded.binary_targets(1), vec![-1.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_string_sort_order() {
        // Labels are strings, so "10" sorts before "2"
        let encoded = EncodedTargets::from_dataset(&dataset(&["2", "10", "1"])).unwrap();
        assert_eq!(encoded.classes, vec!["1", "10", "2"]);
    }

    #[test]
    fn test_single_class_rejected() {
        let result = EncodedTargets::from_dataset(&dataset(&["cat", "cat"]));
        assert!(matches!(result, Err(ClassifierError::InvalidDataset(_))));
    }

    #[test]
    fn test_validate_features_rejects_non_finite() {
        let finite = SplitDataset::from_rows(
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec!["a".to_string(), "b".to_string()],
        )
        .unwrap();
        assert!(validate_features(&finite).is_ok());

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let dataset = SplitDataset::from_rows(
                vec![vec![1.0, 2.0], vec![3.0, bad]],
                vec!["a".to_string(), "b".to_string()],
            )
            .unwrap();
            assert!(matches!(
                validate_features(&dataset),
                Err(ClassifierError::InvalidDataset(_))
            ));
        }
    }

    #[test]
    fn test_validate_params() {
        assert!(validate_params(1.0, 1e-4, 100).is_ok());
        assert!(validate_params(0.0, 1e-4, 100).is_err());
        assert!(validate_params(1.0, -1.0, 100).is_err());
        assert!(validate_params(1.0, 1e-4, 0).is_err());
        assert!(validate_params(f64::NAN, 1e-4, 10).is_err());
    }
}
