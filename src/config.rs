//! File-system layout of a training run

use std::path::{Path, PathBuf};

/// Paths consumed and produced by the training driver
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding one `<split>.csv` file per split
    pub base_csv_path: PathBuf,
    pub train_split: String,
    pub test_split: String,
    /// JSON label decoder written by the feature extraction step
    pub label_encoder_path: PathBuf,
    /// Destination of the persisted linear SVC
    pub model_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_csv_path: PathBuf::from("output"),
            train_split: "training".to_string(),
            test_split: "evaluation".to_string(),
            label_encoder_path: PathBuf::from("output").join("le.json"),
            model_path: PathBuf::from("output").join("model.json"),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_csv_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.base_csv_path = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_train_split<S: Into<String>>(mut self, split: S) -> Self {
        self.train_split = split.into();
        self
    }

    pub fn with_test_split<S: Into<String>>(mut self, split: S) -> Self {
        self.test_split = split.into();
        self
    }

    pub fn with_label_encoder<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.label_encoder_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_model_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.model_path = path.as_ref().to_path_buf();
        self
    }

    /// CSV file backing the named split
    pub fn split_path(&self, split: &str) -> PathBuf {
        self.base_csv_path.join(format!("{split}.csv"))
    }

    pub fn train_path(&self) -> PathBuf {
        self.split_path(&self.train_split)
    }

    pub fn test_path(&self) -> PathBuf {
        self.split_path(&self.test_split)
    }
}
