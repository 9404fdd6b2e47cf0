//! CSV split loader
//!
//! Each line of a split file is one example:
//! - The first column is the label (kept as a string)
//! - All remaining columns are numeric features
//! - Blank lines and `#` comments are skipped

use crate::core::{ClassifierError, Dataset, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One data split (train or test) held as a dense feature matrix
#[derive(Debug, Clone)]
pub struct SplitDataset {
    rows: Vec<Vec<f64>>,
    labels: Vec<String>,
    dimensions: usize,
}

impl SplitDataset {
    /// Load a split from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ClassifierError::IoError(std::io::Error::new(
                e.kind(),
                format!("{}: {e}", path.display()),
            ))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a split from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut labels = Vec::new();

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line.map_err(ClassifierError::IoError)?;
            let line = line.trim();
            let line_no = line_idx + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (label, features) = Self::parse_data_line(line, line_no)?;

            if let Some(first) = rows.first() {
                if first.len() != features.len() {
                    return Err(ClassifierError::DimensionMismatch {
                        line: line_no,
                        expected: first.len(),
                        actual: features.len(),
                    });
                }
            }

            rows.push(features);
            labels.push(label);
        }

        if rows.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }

        let dimensions = rows[0].len();
        Ok(SplitDataset {
            rows,
            labels,
            dimensions,
        })
    }

    /// Build a split from in-memory rows
    pub fn from_rows(rows: Vec<Vec<f64>>, labels: Vec<String>) -> Result<Self> {
        if rows.len() != labels.len() {
            return Err(ClassifierError::InvalidDataset(format!(
                "{} feature rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        if rows.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }

        let dimensions = rows[0].len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != dimensions) {
            return Err(ClassifierError::DimensionMismatch {
                line: i + 1,
                expected: dimensions,
                actual: row.len(),
            });
        }

        Ok(SplitDataset {
            rows,
            labels,
            dimensions,
        })
    }

    /// Parse one CSV record into its label and feature values
    fn parse_data_line(line: &str, line_no: usize) -> Result<(String, Vec<f64>)> {
        let mut fields = line.split(',');
        let label = fields.next().unwrap_or_default().trim().to_string();

        let features = fields
            .enumerate()
            .map(|(idx, field)| {
                match field.trim().parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(value),
                    _ => Err(ClassifierError::ParseError(format!(
                        "line {line_no}: invalid feature value at column {}: {:?}",
                        idx + 2,
                        field
                    ))),
                }
            })
            .collect::<Result<Vec<f64>>>()?;

        if features.is_empty() {
            return Err(ClassifierError::ParseError(format!(
                "line {line_no}: no feature columns after label {label:?}"
            )));
        }

        Ok((label, features))
    }

    /// All feature rows in file order
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}

impl Dataset for SplitDataset {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn dim(&self) -> usize {
        self.dimensions
    }

    fn features(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    fn label(&self, i: usize) -> &str {
        &self.labels[i]
    }

    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }
}
