//! Linear classifiers trained on precomputed CSV feature vectors
//!
//! Loads a training and an evaluation split, fits a logistic regression
//! (L-BFGS) and a linear SVC (dual coordinate descent), reports precision,
//! recall, F1 and a confusion matrix for each, and persists the SVC as JSON.

pub mod classifier;
pub mod config;
pub mod core;
pub mod data;
pub mod driver;
pub mod metrics;
pub mod persistence;
pub mod solver;

// Re-export main types for convenience
pub use crate::classifier::{LinearSvc, LogisticRegression, TrainedLinearSvc, TrainedLogistic};
pub use crate::config::Config;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{ClassifierError, Result};
pub use crate::data::{LabelDecoder, SplitDataset};
pub use crate::metrics::{ClassificationReport, ConfusionMatrix};
pub use crate::persistence::SerializableModel;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
