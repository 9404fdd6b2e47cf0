//! Core traits for datasets, estimators and trained classifiers

use crate::core::{ClassifierError, Prediction, Result};

/// Dataset abstraction: positionally paired feature rows and labels
pub trait Dataset {
    /// Number of samples in the dataset
    fn len(&self) -> usize;

    /// Number of features (dimensionality)
    fn dim(&self) -> usize;

    /// Get the feature row of a sample
    ///
    /// # Panics
    /// Panics if index >= len()
    fn features(&self, i: usize) -> &[f64];

    /// Get the label of a sample
    ///
    /// # Panics
    /// Panics if index >= len()
    fn label(&self, i: usize) -> &str;

    /// Get all labels in sample order
    fn labels(&self) -> Vec<String> {
        (0..self.len()).map(|i| self.label(i).to_string()).collect()
    }

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Untrained model configuration that can be fitted to a dataset
pub trait Estimator {
    type Model: Classifier;

    /// Fit the model on a training dataset
    fn fit<D: Dataset>(&self, dataset: &D) -> Result<Self::Model>;
}

/// Trained classifier
pub trait Classifier: Send + Sync {
    /// Class labels in index order
    fn classes(&self) -> &[String];

    /// Number of features the model was trained on
    fn n_features(&self) -> usize;

    /// One score per class. Binary models return a single score for `classes()[1]`.
    fn decision_function(&self, features: &[f64]) -> Vec<f64>;

    /// Predict a single feature row
    fn predict(&self, features: &[f64]) -> Prediction {
        let scores = self.decision_function(features);
        let classes = self.classes();

        if scores.len() == 1 {
            let score = scores[0];
            let index = usize::from(score > 0.0);
            return Prediction::new(classes[index].clone(), index, score);
        }

        // First maximum wins on ties
        let mut best = 0;
        for (i, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = i;
            }
        }
        Prediction::new(classes[best].clone(), best, scores[best])
    }

    /// Predict every row of a dataset
    fn predict_dataset<D: Dataset>(&self, dataset: &D) -> Result<Vec<Prediction>>
    where
        Self: Sized,
    {
        if !dataset.is_empty() && dataset.dim() != self.n_features() {
            return Err(ClassifierError::FeatureMismatch {
                expected: self.n_features(),
                actual: dataset.dim(),
            });
        }

        Ok((0..dataset.len())
            .map(|i| self.predict(dataset.features(i)))
            .collect())
    }
}
