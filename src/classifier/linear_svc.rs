//! Linear support-vector classifier
//!
//! Squared-hinge loss with L2 regularization, solved per binary problem by
//! dual coordinate descent. More than two classes are handled one-vs-rest.

use crate::classifier::{validate_features, validate_params, EncodedTargets};
use crate::core::{Classifier, ClassifierError, Dataset, Estimator, LinearSvcConfig, Result};
use crate::solver::dual_cd::{dot, DualCoordinateDescent};
use log::{debug, info};

/// Linear SVC estimator with builder pattern
#[derive(Debug, Clone, Default)]
pub struct LinearSvc {
    config: LinearSvcConfig,
}

impl LinearSvc {
    /// Create an estimator with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set maximum number of passes over the data
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the seed controlling coordinate order
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the value of the synthetic bias feature
    pub fn with_intercept_scaling(mut self, intercept_scaling: f64) -> Self {
        self.config.intercept_scaling = intercept_scaling;
        self
    }

    pub fn config(&self) -> &LinearSvcConfig {
        &self.config
    }
}

impl Estimator for LinearSvc {
    type Model = TrainedLinearSvc;

    fn fit<D: Dataset>(&self, dataset: &D) -> Result<TrainedLinearSvc> {
        let config = &self.config;
        validate_params(config.c, config.tolerance, config.max_iterations)?;
        if !(config.intercept_scaling > 0.0) {
            return Err(ClassifierError::InvalidParameter(format!(
                "intercept_scaling must be positive, got {}",
                config.intercept_scaling
            )));
        }
        let targets = EncodedTargets::from_dataset(dataset)?;
        validate_features(dataset)?;

        let rows: Vec<&[f64]> = (0..dataset.len()).map(|i| dataset.features(i)).collect();
        let n_classes = targets.classes.len();
        let solver = DualCoordinateDescent::new(config.clone());

        info!(
            "Fitting linear SVC: {} samples, {} features, {} classes",
            rows.len(),
            dataset.dim(),
            n_classes
        );

        // Binary problems train the second class against the first
        let positive_classes: Vec<usize> = if n_classes == 2 {
            vec![1]
        } else {
            (0..n_classes).collect()
        };

        let mut coefficients = Vec::with_capacity(positive_classes.len());
        let mut intercepts = Vec::with_capacity(positive_classes.len());
        let mut n_iterations = 0;

        for class in positive_classes {
            let solution = solver.solve(&rows, &targets.binary_targets(class))?;
            debug!(
                "class {:?}: {} passes, converged={}",
                targets.classes[class], solution.iterations, solution.converged
            );
            n_iterations = n_iterations.max(solution.iterations);
            coefficients.push(solution.weights);
            intercepts.push(solution.bias);
        }

        Ok(TrainedLinearSvc {
            classes: targets.classes,
            coefficients,
            intercepts,
            n_iterations,
            config: config.clone(),
        })
    }
}

/// Trained linear SVC
#[derive(Debug, Clone)]
pub struct TrainedLinearSvc {
    classes: Vec<String>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    n_iterations: usize,
    config: LinearSvcConfig,
}

impl TrainedLinearSvc {
    /// Rebuild a model from stored parameters
    pub(crate) fn from_parts(
        classes: Vec<String>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
        config: LinearSvcConfig,
    ) -> Self {
        Self {
            classes,
            coefficients,
            intercepts,
            n_iterations: 0,
            config,
        }
    }

    /// Weight rows: one for binary models, one per class otherwise
    pub fn coefficients(&self) -> &[Vec<f64>] {
        &self.coefficients
    }

    pub fn intercepts(&self) -> &[f64] {
        &self.intercepts
    }

    /// Largest number of solver passes over all binary problems
    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }

    /// Parameters the model was trained with
    pub fn config(&self) -> &LinearSvcConfig {
        &self.config
    }
}

impl Classifier for TrainedLinearSvc {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn decision_function(&self, features: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(self.intercepts.iter())
            .map(|(w, b)| dot(w, features) + b)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SplitDataset;

    fn split(rows: Vec<Vec<f64>>, labels: &[&str]) -> SplitDataset {
        SplitDataset::from_rows(rows, labels.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_builder_pattern() {
        let svc = LinearSvc::new()
            .with_c(0.5)
            .with_tolerance(1e-5)
            .with_max_iterations(200)
            .with_seed(7)
            .with_intercept_scaling(2.0);

        assert_eq!(svc.config().c, 0.5);
        assert_eq!(svc.config().tolerance, 1e-5);
        assert_eq!(svc.config().max_iterations, 200);
        assert_eq!(svc.config().seed, 7);
        assert_eq!(svc.config().intercept_scaling, 2.0);
    }

    #[test]
    fn test_binary_two_points() {
        let train = split(vec![vec![1.0, 2.0], vec![3.0, 4.0]], &["cat", "dog"]);
        let model = LinearSvc::new().with_tolerance(1e-5).fit(&train).unwrap();

        assert_eq!(model.coefficients().len(), 1);
        assert_eq!(model.n_features(), 2);
        assert_eq!(model.predict(&[1.1, 2.1]).label, "cat");
        assert_eq!(model.predict(&[3.0, 4.0]).label, "dog");
    }

    #[test]
    fn test_one_vs_rest() {
        let train = split(
            vec![
                vec![0.0, 0.0],
                vec![0.2, 0.1],
                vec![5.0, 5.0],
                vec![5.1, 4.9],
                vec![0.0, 5.0],
                vec![0.1, 5.2],
            ],
            &["a", "a", "b", "b", "c", "c"],
        );
        let model = LinearSvc::new().with_tolerance(1e-5).fit(&train).unwrap();

        assert_eq!(model.coefficients().len(), 3);
        assert_eq!(model.intercepts().len(), 3);
        assert_eq!(model.predict(&[0.1, 0.0]).label, "a");
        assert_eq!(model.predict(&[5.0, 5.2]).label, "b");
        assert_eq!(model.predict(&[0.0, 4.8]).label, "c");

        let predictions = model.predict_dataset(&train).unwrap();
        let labels: Vec<&str> = predictions.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "a", "b", "b", "c", "c"]);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let train = split(
            vec![
                vec![0.5, 1.0],
                vec![1.0, 0.2],
                vec![-0.3, -1.0],
                vec![-1.0, 0.1],
                vec![0.2, 0.3],
            ],
            &["x", "x", "y", "y", "x"],
        );
        let a = LinearSvc::new().with_seed(0).fit(&train).unwrap();
        let b = LinearSvc::new().with_seed(0).fit(&train).unwrap();

        assert_eq!(a.coefficients(), b.coefficients());
        assert_eq!(a.intercepts(), b.intercepts());
    }

    #[test]
    fn test_non_finite_features_rejected() {
        let train = split(
            vec![
                vec![1.0, 2.0],
                vec![3.0, 4.0],
                vec![f64::NAN, 1.0],
                vec![f64::INFINITY, 0.0],
            ],
            &["cat", "dog", "cat", "dog"],
        );
        assert!(matches!(
            LinearSvc::new().fit(&train),
            Err(ClassifierError::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        let train = split(vec![vec![1.0], vec![2.0]], &["a", "b"]);
        assert!(matches!(
            LinearSvc::new().with_tolerance(0.0).fit(&train),
            Err(ClassifierError::InvalidParameter(_))
        ));
        assert!(matches!(
            LinearSvc::new().with_intercept_scaling(0.0).fit(&train),
            Err(ClassifierError::InvalidParameter(_))
        ));
    }
}
