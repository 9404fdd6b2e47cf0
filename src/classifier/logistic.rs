//! Logistic regression trained with L-BFGS
//!
//! Two classes use the binary logistic loss with one weight vector. More
//! classes use the multinomial (softmax) loss with one weight row per class.
//! The objective is the mean log-loss plus `||W||^2 / (2 * C * n)`; the
//! intercepts are not penalized.

use crate::classifier::{validate_features, validate_params, EncodedTargets};
use crate::core::{Classifier, Dataset, Estimator, LogisticConfig, Result};
use crate::solver::dual_cd::dot;
use crate::solver::Lbfgs;
use log::{debug, info, warn};

/// Logistic regression estimator with builder pattern
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    config: LogisticConfig,
}

impl LogisticRegression {
    /// Create an estimator with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set inverse regularization strength C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set gradient tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set maximum number of L-BFGS iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the number of correction pairs kept by L-BFGS
    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.config.history_size = history_size;
        self
    }

    pub fn config(&self) -> &LogisticConfig {
        &self.config
    }
}

impl Estimator for LogisticRegression {
    type Model = TrainedLogistic;

    fn fit<D: Dataset>(&self, dataset: &D) -> Result<TrainedLogistic> {
        let config = &self.config;
        validate_params(config.c, config.tolerance, config.max_iterations)?;
        let targets = EncodedTargets::from_dataset(dataset)?;
        validate_features(dataset)?;

        let n = dataset.len();
        let dim = dataset.dim();
        let n_classes = targets.classes.len();
        let reg = 1.0 / (config.c * n as f64);
        let solver = Lbfgs::from_config(config);

        info!(
            "Fitting logistic regression: {n} samples, {dim} features, {n_classes} classes"
        );

        let (coefficients, intercepts, result) = if n_classes == 2 {
            let y = targets.binary_targets(1);
            let result = solver.minimize(
                |params, grad| binary_loss(dataset, &y, reg, params, grad),
                vec![0.0; dim + 1],
            )?;
            let coefficients = vec![result.x[..dim].to_vec()];
            let intercepts = vec![result.x[dim]];
            (coefficients, intercepts, result)
        } else {
            let result = solver.minimize(
                |params, grad| multinomial_loss(dataset, &targets.indices, n_classes, reg, params, grad),
                vec![0.0; n_classes * (dim + 1)],
            )?;
            let coefficients = result.x[..n_classes * dim]
                .chunks(dim)
                .map(<[f64]>::to_vec)
                .collect();
            let intercepts = result.x[n_classes * dim..].to_vec();
            (coefficients, intercepts, result)
        };

        if result.converged {
            debug!(
                "L-BFGS converged after {} iterations, loss {:.6}",
                result.iterations, result.value
            );
        } else {
            warn!(
                "logistic regression stopped after {} iterations without converging (loss {:.6}); \
                 consider increasing max_iterations",
                result.iterations, result.value
            );
        }

        Ok(TrainedLogistic {
            classes: targets.classes,
            coefficients,
            intercepts,
            n_iterations: result.iterations,
            config: config.clone(),
        })
    }
}

/// Binary logistic loss with labels in {-1, +1}
fn binary_loss<D: Dataset>(dataset: &D, y: &[f64], reg: f64, params: &[f64], grad: &mut [f64]) -> f64 {
    let dim = dataset.dim();
    let n = dataset.len() as f64;
    let (w, b) = params.split_at(dim);
    grad.fill(0.0);

    let mut loss = 0.0;
    for (i, &yi) in y.iter().enumerate() {
        let x = dataset.features(i);
        let z = dot(w, x) + b[0];
        let margin = yi * z;
        loss += log1p_exp(-margin);

        // d/dz log(1 + exp(-y z)) = -y * sigmoid(-y z)
        let coef = -yi * sigmoid(-margin);
        for (g, &xj) in grad[..dim].iter_mut().zip(x.iter()) {
            *g += coef * xj;
        }
        grad[dim] += coef;
    }

    loss /= n;
    for g in grad.iter_mut() {
        *g /= n;
    }

    loss += 0.5 * reg * dot(w, w);
    for (g, &wj) in grad[..dim].iter_mut().zip(w.iter()) {
        *g += reg * wj;
    }
    loss
}

/// Multinomial cross-entropy; `params` holds the weight rows then the intercepts
fn multinomial_loss<D: Dataset>(
    dataset: &D,
    y: &[usize],
    n_classes: usize,
    reg: f64,
    params: &[f64],
    grad: &mut [f64],
) -> f64 {
    let dim = dataset.dim();
    let n = dataset.len() as f64;
    let (weights, intercepts) = params.split_at(n_classes * dim);
    grad.fill(0.0);

    let mut scores = vec![0.0; n_classes];
    let mut loss = 0.0;

    for (i, &yi) in y.iter().enumerate() {
        let x = dataset.features(i);
        for (k, score) in scores.iter_mut().enumerate() {
            *score = dot(&weights[k * dim..(k + 1) * dim], x) + intercepts[k];
        }

        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let sum_exp: f64 = scores.iter().map(|s| (s - max).exp()).sum();
        let log_norm = max + sum_exp.ln();
        loss += log_norm - scores[yi];

        for k in 0..n_classes {
            let p = (scores[k] - log_norm).exp();
            let residual = if k == yi { p - 1.0 } else { p };
            for (g, &xj) in grad[k * dim..(k + 1) * dim].iter_mut().zip(x.iter()) {
                *g += residual * xj;
            }
            grad[n_classes * dim + k] += residual;
        }
    }

    loss /= n;
    for g in grad.iter_mut() {
        *g /= n;
    }

    loss += 0.5 * reg * dot(weights, weights);
    for (g, &wj) in grad[..n_classes * dim].iter_mut().zip(weights.iter()) {
        *g += reg * wj;
    }
    loss
}

/// Numerically stable log(1 + exp(x))
fn log1p_exp(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Trained logistic regression model
#[derive(Debug, Clone)]
pub struct TrainedLogistic {
    classes: Vec<String>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    n_iterations: usize,
    config: LogisticConfig,
}

impl TrainedLogistic {
    /// Rebuild a model from stored parameters
    pub(crate) fn from_parts(
        classes: Vec<String>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
        config: LogisticConfig,
    ) -> Self {
        Self {
            classes,
            coefficients,
            intercepts,
            n_iterations: 0,
            config,
        }
    }

    /// Parameters the model was trained with
    pub fn config(&self) -> &LogisticConfig {
        &self.config
    }

    /// Weight rows: one for binary models, one per class otherwise
    pub fn coefficients(&self) -> &[Vec<f64>] {
        &self.coefficients
    }

    pub fn intercepts(&self) -> &[f64] {
        &self.intercepts
    }

    /// Number of L-BFGS iterations used during training
    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }

    /// Class probabilities in class order
    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let scores = self.decision_function(features);
        if scores.len() == 1 {
            let p = sigmoid(scores[0]);
            return vec![1.0 - p, p];
        }
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / sum).collect()
    }
}

impl Classifier for TrainedLogistic {
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
    use crate::core::ClassifierError;
    use crate::data::SplitDataset;
    use approx::assert_abs_diff_eq;

    fn split(rows: Vec<Vec<f64>>, labels: &[&str]) -> SplitDataset {
        SplitDataset::from_rows(rows, labels.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_builder_pattern() {
        let lr = LogisticRegression::new()
            .with_c(2.0)
            .with_tolerance(1e-6)
            .with_max_iterations(1000)
            .with_history_size(5);

        assert_eq!(lr.config().c, 2.0);
        assert_eq!(lr.config().tolerance, 1e-6);
        assert_eq!(lr.config().max_iterations, 1000);
        assert_eq!(lr.config().history_size, 5);
    }

    #[test]
    fn test_binary_two_points() {
        let train = split(vec![vec![1.0, 2.0], vec![3.0, 4.0]], &["cat", "dog"]);
        let model = LogisticRegression::new()
            .with_max_iterations(1000)
            .fit(&train)
            .unwrap();

        assert_eq!(model.classes(), &["cat", "dog"]);
        assert_eq!(model.coefficients().len(), 1);
        assert_eq!(model.predict(&[1.1, 2.1]).label, "cat");
        assert_eq!(model.predict(&[3.0, 4.0]).label, "dog");

        // Symmetric problem: both weights equal
        let w = &model.coefficients()[0];
        assert_abs_diff_eq!(w[0], w[1], epsilon = 1e-3);
    }

    #[test]
    fn test_multinomial_three_clusters() {
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
        let model = LogisticRegression::new()
            .with_max_iterations(1000)
            .fit(&train)
            .unwrap();

        assert_eq!(model.coefficients().len(), 3);
        assert_eq!(model.predict(&[0.1, 0.0]).label, "a");
        assert_eq!(model.predict(&[5.0, 5.2]).label, "b");
        assert_eq!(model.predict(&[0.0, 4.8]).label, "c");

        let proba = model.predict_proba(&[0.1, 0.0]);
        assert_abs_diff_eq!(proba.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(proba[0] > proba[1] && proba[0] > proba[2]);
    }

    #[test]
    fn test_binary_gradient_matches_finite_difference() {
        let train = split(
            vec![vec![0.5, -1.0], vec![1.5, 2.0], vec![-0.3, 0.7]],
            &["0", "1", "1"],
        );
        let y = [-1.0, 1.0, 1.0];
        let params = [0.3, -0.2, 0.1];
        let mut grad = [0.0; 3];
        binary_loss(&train, &y, 0.5, &params, &mut grad);

        let h = 1e-6;
        for j in 0..3 {
            let mut plus = params;
            let mut minus = params;
            plus[j] += h;
            minus[j] -= h;
            let mut scratch = [0.0; 3];
            let numeric = (binary_loss(&train, &y, 0.5, &plus, &mut scratch)
                - binary_loss(&train, &y, 0.5, &minus, &mut scratch))
                / (2.0 * h);
            assert_abs_diff_eq!(grad[j], numeric, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_multinomial_gradient_matches_finite_difference() {
        let train = split(
            vec![vec![0.5, -1.0], vec![1.5, 2.0], vec![-0.3, 0.7]],
            &["a", "b", "c"],
        );
        let y = [0, 1, 2];
        let params = [0.3, -0.2, 0.1, 0.4, -0.5, 0.2, 0.05, -0.1, 0.0];
        let mut grad = [0.0; 9];
        multinomial_loss(&train, &y, 3, 0.5, &params, &mut grad);

        let h = 1e-6;
        for j in 0..params.len() {
            let mut plus = params;
            let mut minus = params;
            plus[j] += h;
            minus[j] -= h;
            let mut scratch = [0.0; 9];
            let numeric = (multinomial_loss(&train, &y, 3, 0.5, &plus, &mut scratch)
                - multinomial_loss(&train, &y, 3, 0.5, &minus, &mut scratch))
                / (2.0 * h);
            assert_abs_diff_eq!(grad[j], numeric, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_non_finite_features_rejected() {
        let train = split(
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![f64::NAN, 1.0]],
            &["cat", "dog", "cat"],
        );
        assert!(matches!(
            LogisticRegression::new().fit(&train),
            Err(ClassifierError::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        let one_class = split(vec![vec![1.0], vec![2.0]], &["a", "a"]);
        assert!(matches!(
            LogisticRegression::new().fit(&one_class),
            Err(ClassifierError::InvalidDataset(_))
        ));

        let train = split(vec![vec![1.0], vec![2.0]], &["a", "b"]);
        assert!(matches!(
            LogisticRegression::new().with_c(0.0).fit(&train),
            Err(ClassifierError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_predict_dataset_checks_dimensions() {
        let train = split(vec![vec![1.0, 2.0], vec![3.0, 4.0]], &["cat", "dog"]);
        let test = split(vec![vec![1.0, 2.0, 3.0]], &["cat"]);
        let model = LogisticRegression::new().fit(&train).unwrap();

        assert!(matches!(
            model.predict_dataset(&test),
            Err(ClassifierError::FeatureMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }
}
