//! Label decoder
//!
//! Maps encoded labels (class indices written by the feature extractor)
//! back to display names. Stored on disk as `{"classes": [...]}`.

use crate::core::{ClassifierError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDecoder {
    classes: Vec<String>,
}

impl LabelDecoder {
    /// Create a decoder from class names in index order
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Build a decoder from raw labels; classes are the sorted unique values
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        Self {
            classes: unique.into_iter().collect(),
        }
    }

    /// Load a decoder from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ClassifierError::IoError(std::io::Error::new(
                e.kind(),
                format!("{}: {e}", path.display()),
            ))
        })?;
        let decoder: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ClassifierError::SerializationError(e.to_string()))?;

        if decoder.classes.is_empty() {
            return Err(ClassifierError::InvalidDataset(format!(
                "label decoder {} has no classes",
                path.display()
            )));
        }
        Ok(decoder)
    }

    /// Save the decoder as JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(ClassifierError::IoError)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| ClassifierError::SerializationError(e.to_string()))?;
        writer.flush().map_err(ClassifierError::IoError)
    }

    /// Display name for an encoded label
    ///
    /// A decimal index decodes to the class at that position; a label that
    /// already is a class name decodes to itself. The index reading wins, so
    /// with classes `["1", "2"]` the label `"1"` decodes to `"2"`.
    pub fn decode<'a>(&'a self, label: &'a str) -> Result<&'a str> {
        if let Ok(index) = label.parse::<usize>() {
            if let Some(name) = self.classes.get(index) {
                return Ok(name.as_str());
            }
        }
        if self.classes.iter().any(|c| c == label) {
            return Ok(label);
        }
        Err(ClassifierError::UnknownLabel(label.to_string()))
    }

    /// Encoded index for a class name
    pub fn encode(&self, name: &str) -> Result<usize> {
        self.classes
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ClassifierError::UnknownLabel(name.to_string()))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_fit_sorts_unique() {
        let decoder = LabelDecoder::fit(["non_food", "food", "food"]);
        assert_eq!(decoder.classes(), &["food", "non_food"]);
        assert_eq!(decoder.encode("non_food").unwrap(), 1);
    }

    #[test]
    fn test_decode_index_and_name() {
        let decoder = LabelDecoder::new(vec!["food".to_string(), "non_food".to_string()]);

        assert_eq!(decoder.decode("0").unwrap(), "food");
        assert_eq!(decoder.decode("1").unwrap(), "non_food");
        assert_eq!(decoder.decode("food").unwrap(), "food");
        assert!(matches!(
            decoder.decode("2"),
            Err(ClassifierError::UnknownLabel(_))
        ));
        assert!(decoder.decode("pizza").is_err());
    }

    #[test]
    fn test_decode_prefers_index_over_numeric_name() {
        let decoder = LabelDecoder::new(vec!["1".to_string(), "2".to_string()]);

        assert_eq!(decoder.decode("0").unwrap(), "1");
        assert_eq!(decoder.decode("1").unwrap(), "2");
        // Out of range as an index, but still a class name
        assert_eq!(decoder.decode("2").unwrap(), "2");
    }

    #[test]
    fn test_save_and_load() {
        let decoder = LabelDecoder::fit(["cat", "dog"]);
        let file = NamedTempFile::new().unwrap();

        decoder.save_to_file(file.path()).unwrap();
        let loaded = LabelDecoder::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, decoder);
    }

    #[test]
    fn test_load_rejects_empty_and_malformed() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"classes": []}"#).unwrap();
        assert!(matches!(
            LabelDecoder::load_from_file(file.path()),
            Err(ClassifierError::InvalidDataset(_))
        ));

        std::fs::write(file.path(), "not json").unwrap();
        assert!(matches!(
            LabelDecoder::load_from_file(file.path()),
            Err(ClassifierError::SerializationError(_))
        ));
    }
}
