//! Model serialization and persistence
//!
//! Trained models are written as pretty-printed JSON. The file holds no
//! timestamp, so identical training inputs produce identical bytes.

use crate::classifier::{TrainedLinearSvc, TrainedLogistic};
use crate::core::{Classifier, ClassifierError, LinearSvcConfig, LogisticConfig, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

const LINEAR_SVC: &str = "linear_svc";
const LOGISTIC_REGRESSION: &str = "logistic_regression";

/// Serializable representation of a trained linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableModel {
    /// Model type identifier
    pub model_type: String,
    /// Class labels in index order
    pub classes: Vec<String>,
    /// One weight row per decision function
    pub coefficients: Vec<Vec<f64>>,
    /// One intercept per decision function
    pub intercepts: Vec<f64>,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    pub n_features: usize,
    pub n_classes: usize,
    /// Training parameters used
    pub training_params: TrainingParams,
}

/// Training parameters for reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    pub c: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intercept_scaling: Option<f64>,
}

impl From<&TrainedLinearSvc> for SerializableModel {
    fn from(model: &TrainedLinearSvc) -> Self {
        let config = model.config();
        Self {
            model_type: LINEAR_SVC.to_string(),
            classes: model.classes().to_vec(),
            coefficients: model.coefficients().to_vec(),
            intercepts: model.intercepts().to_vec(),
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                n_features: model.n_features(),
                n_classes: model.classes().len(),
                training_params: TrainingParams {
                    c: config.c,
                    tolerance: config.tolerance,
                    max_iterations: config.max_iterations,
                    seed: Some(config.seed),
                    intercept_scaling: Some(config.intercept_scaling),
                },
            },
        }
    }
}

impl From<&TrainedLogistic> for SerializableModel {
    fn from(model: &TrainedLogistic) -> Self {
        let config = model.config();
        Self {
            model_type: LOGISTIC_REGRESSION.to_string(),
            classes: model.classes().to_vec(),
            coefficients: model.coefficients().to_vec(),
            intercepts: model.intercepts().to_vec(),
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                n_features: model.n_features(),
                n_classes: model.classes().len(),
                training_params: TrainingParams {
                    c: config.c,
                    tolerance: config.tolerance,
                    max_iterations: config.max_iterations,
                    seed: None,
                    intercept_scaling: None,
                },
            },
        }
    }
}

impl SerializableModel {
    /// Save model to file, replacing any existing file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(ClassifierError::IoError)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| ClassifierError::SerializationError(e.to_string()))?;
        writer.write_all(b"\n").map_err(ClassifierError::IoError)?;
        writer.flush().map_err(ClassifierError::IoError)?;
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(ClassifierError::IoError)?;
        let reader = BufReader::new(file);
        let model: Self = serde_json::from_reader(reader)
            .map_err(|e| ClassifierError::SerializationError(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Check that the stored shapes are consistent
    fn validate(&self) -> Result<()> {
        let n_classes = self.classes.len();
        let expected_rows = if n_classes == 2 { 1 } else { n_classes };

        if n_classes < 2 || self.coefficients.len() != expected_rows {
            return Err(ClassifierError::SerializationError(format!(
                "{} classes but {} coefficient rows",
                n_classes,
                self.coefficients.len()
            )));
        }
        if self.intercepts.len() != self.coefficients.len() {
            return Err(ClassifierError::SerializationError(format!(
                "{} coefficient rows but {} intercepts",
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }
        let n_features = self.metadata.n_features;
        if let Some(row) = self.coefficients.iter().find(|r| r.len() != n_features) {
            return Err(ClassifierError::SerializationError(format!(
                "coefficient row has {} values, expected {}",
                row.len(),
                n_features
            )));
        }
        Ok(())
    }

    /// Convert back to a trained linear SVC
    pub fn to_linear_svc(&self) -> Result<TrainedLinearSvc> {
        if self.model_type != LINEAR_SVC {
            return Err(ClassifierError::InvalidParameter(format!(
                "expected a {LINEAR_SVC} model, found {}",
                self.model_type
            )));
        }
        self.validate()?;

        let params = &self.metadata.training_params;
        let defaults = LinearSvcConfig::default();
        let config = LinearSvcConfig {
            c: params.c,
            tolerance: params.tolerance,
            max_iterations: params.max_iterations,
            seed: params.seed.unwrap_or(defaults.seed),
            intercept_scaling: params
                .intercept_scaling
                .unwrap_or(defaults.intercept_scaling),
        };

        Ok(TrainedLinearSvc::from_parts(
            self.classes.clone(),
            self.coefficients.clone(),
            self.intercepts.clone(),
            config,
        ))
    }

    /// Convert back to a trained logistic regression
    pub fn to_logistic(&self) -> Result<TrainedLogistic> {
        if self.model_type != LOGISTIC_REGRESSION {
            return Err(ClassifierError::InvalidParameter(format!(
                "expected a {LOGISTIC_REGRESSION} model, found {}",
                self.model_type
            )));
        }
        self.validate()?;

        let params = &self.metadata.training_params;
        let config = LogisticConfig {
            c: params.c,
            tolerance: params.tolerance,
            max_iterations: params.max_iterations,
            ..LogisticConfig::default()
        };

        Ok(TrainedLogistic::from_parts(
            self.classes.clone(),
            self.coefficients.clone(),
            self.intercepts.clone(),
            config,
        ))
    }

    /// Print model summary
    pub fn print_summary(&self) {
        println!("=== Model Summary ===");
        println!("Model Type: {}", self.model_type);
        println!("Classes: {}", self.classes.join(", "));
        println!("Features: {}", self.metadata.n_features);
        println!("Decision Functions: {}", self.coefficients.len());
        println!("Library Version: {}", self.metadata.library_version);
        println!("Training Parameters:");
        let params = &self.metadata.training_params;
        println!("  C: {}", params.c);
        println!("  Tolerance: {}", params.tolerance);
        println!("  Max Iterations: {}", params.max_iterations);
        if let Some(seed) = params.seed {
            println!("  Seed: {seed}");
        }
        if let Some(scaling) = params.intercept_scaling {
            println!("  Intercept Scaling: {scaling}");
        }
    }
}
