//! Core type definitions shared by the linear models

/// Prediction result containing the class label and its decision value
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted class label
    pub label: String,
    /// Index of the label in the model's class list
    pub class_index: usize,
    /// Raw decision function value of the winning class
    pub decision_value: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: String, class_index: usize, decision_value: f64) -> Self {
        Self {
            label,
            class_index,
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// Configuration for logistic regression training
#[derive(Debug, Clone)]
pub struct LogisticConfig {
    /// Inverse regularization strength
    pub c: f64,
    /// Stop when the largest gradient component falls below this value
    pub tolerance: f64,
    /// Maximum number of L-BFGS iterations
    pub max_iterations: usize,
    /// Number of correction pairs kept by L-BFGS
    pub history_size: usize,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 1e-4,
            max_iterations: 100,
            history_size: 10,
        }
    }
}

/// Configuration for linear support-vector classification
#[derive(Debug, Clone)]
pub struct LinearSvcConfig {
    /// Regularization parameter (penalty on squared hinge loss)
    pub c: f64,
    /// Tolerance on the projected-gradient gap of the dual problem
    pub tolerance: f64,
    /// Maximum number of passes over the training data
    pub max_iterations: usize,
    /// Seed for the coordinate shuffling order
    pub seed: u64,
    /// Value of the constant feature appended for the bias term
    pub intercept_scaling: f64,
}

impl Default for LinearSvcConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 1e-4,
            max_iterations: 1000,
            seed: 0,
            intercept_scaling: 1.0,
        }
    }
}
