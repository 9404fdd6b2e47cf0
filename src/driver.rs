//! Training and evaluation pipeline
//!
//! Loads both splits and the label decoder, fits a logistic regression and a
//! linear SVC on the training split, writes an evaluation report for each to
//! `out` and persists the SVC.

use crate::classifier::{LinearSvc, LogisticRegression};
use crate::config::Config;
use crate::core::{Classifier, Dataset, Estimator, Result};
use crate::data::{LabelDecoder, SplitDataset};
use crate::metrics::{accuracy, unique_labels, ClassificationReport, ConfusionMatrix};
use crate::persistence::SerializableModel;
use log::{debug, info};
use std::io::Write;

/// Iteration cap used for the logistic regression
const LOGISTIC_MAX_ITERATIONS: usize = 1000;
const SVC_TOLERANCE: f64 = 1e-5;
const SVC_SEED: u64 = 0;

/// Run the full pipeline described by `config`
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<()> {
    info!("loading data...");
    let train = SplitDataset::from_file(config.train_path())?;
    let test = SplitDataset::from_file(config.test_path())?;
    let decoder = LabelDecoder::load_from_file(&config.label_encoder_path)?;
    debug!(
        "train: {} rows, test: {} rows, {} features, {} decoder classes",
        train.len(),
        test.len(),
        train.dim(),
        decoder.len()
    );

    info!("training LR model...");
    let logistic = LogisticRegression::new()
        .with_max_iterations(LOGISTIC_MAX_ITERATIONS)
        .fit(&train)?;

    info!("evaluating...");
    evaluate(&logistic, &test, &decoder, out)?;

    info!("training L.SVM model...");
    let svc = LinearSvc::new()
        .with_tolerance(SVC_TOLERANCE)
        .with_seed(SVC_SEED)
        .fit(&train)?;

    info!("evaluating...");
    evaluate(&svc, &test, &decoder, out)?;

    info!("saving model...");
    SerializableModel::from(&svc).save_to_file(&config.model_path)?;
    debug!("model written to {}", config.model_path.display());

    Ok(())
}

/// Predict `test` and write the report, accuracy and confusion matrix
pub fn evaluate<C, D, W>(model: &C, test: &D, decoder: &LabelDecoder, out: &mut W) -> Result<()>
where
    C: Classifier,
    D: Dataset,
    W: Write,
{
    let predictions: Vec<String> = model
        .predict_dataset(test)?
        .into_iter()
        .map(|p| p.label)
        .collect();
    let truth = test.labels();

    // Only labels the model actually predicted get a report row
    let reported = unique_labels::<String, String>(&[], &predictions);
    let report = ClassificationReport::new(&truth, &predictions, &reported, decoder)?;
    let matrix = ConfusionMatrix::new(&truth, &predictions)?;

    writeln!(out, "{report}")?;
    writeln!(out, "Accuracy : {:?}\n", accuracy(&truth, &predictions))?;
    writeln!(out, "{matrix}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClassifierError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_fixture(dir: &Path, train: &str, test: &str, classes: &[&str]) -> Config {
        fs::write(dir.join("training.csv"), train).unwrap();
        fs::write(dir.join("evaluation.csv"), test).unwrap();
        let decoder = LabelDecoder::new(classes.iter().map(|c| c.to_string()).collect());
        decoder.save_to_file(dir.join("le.json")).unwrap();

        Config::new()
            .with_csv_dir(dir)
            .with_label_encoder(dir.join("le.json"))
            .with_model_path(dir.join("model.json"))
    }

    #[test]
    fn test_run_three_classes() {
        let dir = TempDir::new().unwrap();
        let config = write_fixture(
            dir.path(),
            "0,0.0,0.0\n0,0.2,0.1\n1,5.0,5.0\n1,5.1,4.9\n2,0.0,5.0\n2,0.1,5.2\n",
            "0,0.1,0.0\n1,5.0,5.2\n2,0.0,4.8\n",
            &["apple", "banana", "cherry"],
        );

        let mut out = Vec::new();
        run(&config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches("Accuracy : 1.0\n").count(), 2);
        assert_eq!(text.matches("[[1 0 0]\n [0 1 0]\n [0 0 1]]").count(), 2);
        assert!(text.contains("apple"));
        assert!(text.contains("cherry"));
        assert!(text.contains("weighted avg"));

        let model = SerializableModel::load_from_file(&config.model_path).unwrap();
        assert_eq!(model.model_type, "linear_svc");
        assert_eq!(model.classes, vec!["0", "1", "2"]);
        assert_eq!(model.metadata.training_params.tolerance, 1e-5);
    }

    #[test]
    fn test_evaluate_writes_sections_in_order() {
        let train = SplitDataset::from_rows(
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec!["cat".to_string(), "dog".to_string()],
        )
        .unwrap();
        let test = SplitDataset::from_rows(vec![vec![1.1, 2.1]], vec!["cat".to_string()]).unwrap();
        let decoder = LabelDecoder::fit(["cat", "dog"]);
        let model = LinearSvc::new().with_tolerance(1e-5).fit(&train).unwrap();

        let mut out = Vec::new();
        evaluate(&model, &test, &decoder, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let report_at = text.find("precision").unwrap();
        let accuracy_at = text.find("Accuracy : 1.0").unwrap();
        let matrix_at = text.find("[[1]]").unwrap();
        assert!(report_at < accuracy_at && accuracy_at < matrix_at);
    }

    #[test]
    fn test_missing_split_fails() {
        let dir = TempDir::new().unwrap();
        let config = Config::new().with_csv_dir(dir.path());

        let result = run(&config, &mut Vec::new());
        assert!(matches!(result, Err(ClassifierError::IoError(_))));
    }

    #[test]
    fn test_ragged_split_fails_before_training() {
        let dir = TempDir::new().unwrap();
        let config = write_fixture(
            dir.path(),
            "cat,1.0,2.0\ndog,3.0\n",
            "cat,1.1,2.1\n",
            &["cat", "dog"],
        );

        let result = run(&config, &mut Vec::new());
        assert!(matches!(
            result,
            Err(ClassifierError::DimensionMismatch { line: 2, .. })
        ));
        assert!(!config.model_path.exists());
    }
}
