//! Classification metrics: accuracy, per-class report and confusion matrix

use crate::core::{ClassifierError, Result};
use crate::data::LabelDecoder;
use std::collections::BTreeSet;
use std::fmt;

/// Fraction of predictions that exactly match the true labels
pub fn accuracy<S: AsRef<str>, T: AsRef<str>>(y_true: &[S], y_pred: &[T]) -> f64 {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return 0.0;
    }

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t.as_ref() == p.as_ref())
        .count();

    correct as f64 / y_true.len() as f64
}

/// Sorted union of the labels appearing in both vectors
pub fn unique_labels<S: AsRef<str>, T: AsRef<str>>(y_true: &[S], y_pred: &[T]) -> Vec<String> {
    y_true
        .iter()
        .map(AsRef::as_ref)
        .chain(y_pred.iter().map(AsRef::as_ref))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn check_lengths(n_true: usize, n_pred: usize) -> Result<()> {
    if n_true != n_pred {
        return Err(ClassifierError::InvalidDataset(format!(
            "{n_true} true labels but {n_pred} predictions"
        )));
    }
    Ok(())
}

/// Confusion matrix: entry (i, j) counts samples of true class i predicted as j
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Build a matrix over the sorted union of true and predicted labels
    pub fn new<S: AsRef<str>, T: AsRef<str>>(y_true: &[S], y_pred: &[T]) -> Result<Self> {
        check_lengths(y_true.len(), y_pred.len())?;

        let labels = unique_labels(y_true, y_pred);
        let k = labels.len();
        let mut counts = vec![vec![0; k]; k];

        for (t, p) in y_true.iter().zip(y_pred.iter()) {
            let i = index_of(&labels, t.as_ref());
            let j = index_of(&labels, p.as_ref());
            counts[i][j] += 1;
        }

        Ok(Self { labels, counts })
    }

    /// Row and column labels in order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Count of samples with true label index `i` predicted as label index `j`
    pub fn get(&self, i: usize, j: usize) -> usize {
        self.counts[i][j]
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Total number of samples
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

fn index_of(labels: &[String], label: &str) -> usize {
    labels
        .binary_search_by(|l| l.as_str().cmp(label))
        .unwrap_or_default()
}

impl fmt::Display for ConfusionMatrix {
    /// NumPy-style integer grid, e.g. `[[3 1]\n [0 4]]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);

        write!(f, "[")?;
        for (i, row) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, "\n ")?;
            }
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
            write!(f, "[{}]", cells.join(" "))?;
        }
        write!(f, "]")
    }
}

/// Counts for a single class, one-vs-rest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassMetrics {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl ClassMetrics {
    /// Calculate precision: TP / (TP + FP), 0 when nothing was predicted
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Calculate recall: TP / (TP + FN), 0 when the class never occurs
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.support())
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        f1(self.precision(), self.recall())
    }

    /// Number of samples whose true label is this class
    pub fn support(&self) -> usize {
        self.true_positives + self.false_negatives
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(p: f64, r: f64) -> f64 {
    if p + r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

/// One line of a classification report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Per-class precision/recall/F1 table with summary rows
#[derive(Debug, Clone)]
pub struct ClassificationReport {
    rows: Vec<ReportRow>,
    /// Present when the label subset covers every observed label
    accuracy: Option<f64>,
    /// Micro average, reported instead of accuracy for partial label subsets
    micro_avg: Option<ReportRow>,
    macro_avg: ReportRow,
    weighted_avg: ReportRow,
}

impl ClassificationReport {
    /// Build a report restricted to `labels`, named through `decoder`
    pub fn new<S: AsRef<str>, T: AsRef<str>>(
        y_true: &[S],
        y_pred: &[T],
        labels: &[String],
        decoder: &LabelDecoder,
    ) -> Result<Self> {
        check_lengths(y_true.len(), y_pred.len())?;

        let mut per_class = vec![ClassMetrics::default(); labels.len()];
        for (t, p) in y_true.iter().zip(y_pred.iter()) {
            let (t, p) = (t.as_ref(), p.as_ref());
            for (label, m) in labels.iter().zip(per_class.iter_mut()) {
                match (t == label.as_str(), p == label.as_str()) {
                    (true, true) => m.true_positives += 1,
                    (false, true) => m.false_positives += 1,
                    (true, false) => m.false_negatives += 1,
                    (false, false) => {}
                }
            }
        }

        let rows = labels
            .iter()
            .zip(per_class.iter())
            .map(|(label, m)| {
                Ok(ReportRow {
                    name: decoder.decode(label)?.to_string(),
                    precision: m.precision(),
                    recall: m.recall(),
                    f1_score: m.f1_score(),
                    support: m.support(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let total_support: usize = rows.iter().map(|r| r.support).sum();
        let n_rows = rows.len().max(1) as f64;
        let macro_avg = ReportRow {
            name: "macro avg".to_string(),
            precision: rows.iter().map(|r| r.precision).sum::<f64>() / n_rows,
            recall: rows.iter().map(|r| r.recall).sum::<f64>() / n_rows,
            f1_score: rows.iter().map(|r| r.f1_score).sum::<f64>() / n_rows,
            support: total_support,
        };

        let weighted_avg = ReportRow {
            name: "weighted avg".to_string(),
            precision: weighted_mean(&rows, |r| r.precision),
            recall: weighted_mean(&rows, |r| r.recall),
            f1_score: weighted_mean(&rows, |r| r.f1_score),
            support: total_support,
        };

        let observed = unique_labels(y_true, y_pred);
        let covers_all = observed.iter().all(|l| labels.contains(l));

        let (accuracy_value, micro_avg) = if covers_all {
            (Some(accuracy(y_true, y_pred)), None)
        } else {
            let micro = ClassMetrics {
                true_positives: per_class.iter().map(|m| m.true_positives).sum(),
                false_positives: per_class.iter().map(|m| m.false_positives).sum(),
                false_negatives: per_class.iter().map(|m| m.false_negatives).sum(),
            };
            let row = ReportRow {
                name: "micro avg".to_string(),
                precision: micro.precision(),
                recall: micro.recall(),
                f1_score: micro.f1_score(),
                support: total_support,
            };
            (None, Some(row))
        };

        Ok(Self {
            rows,
            accuracy: accuracy_value,
            micro_avg,
            macro_avg,
            weighted_avg,
        })
    }

    /// Per-class rows in label order
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.accuracy
    }

    pub fn micro_avg(&self) -> Option<&ReportRow> {
        self.micro_avg.as_ref()
    }

    pub fn macro_avg(&self) -> &ReportRow {
        &self.macro_avg
    }

    pub fn weighted_avg(&self) -> &ReportRow {
        &self.weighted_avg
    }
}

/// Support-weighted mean of a report column
fn weighted_mean<F: Fn(&ReportRow) -> f64>(rows: &[ReportRow], value: F) -> f64 {
    let total: usize = rows.iter().map(|r| r.support).sum();
    if total == 0 {
        return 0.0;
    }
    rows.iter().map(|r| value(r) * r.support as f64).sum::<f64>() / total as f64
}

fn write_row(f: &mut fmt::Formatter<'_>, r: &ReportRow, width: usize) -> fmt::Result {
    writeln!(
        f,
        "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
        r.name, r.precision, r.recall, r.f1_score, r.support
    )
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("weighted avg".len());

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for row in &self.rows {
            write_row(f, row, width)?;
        }
        writeln!(f)?;

        if let Some(acc) = self.accuracy {
            writeln!(
                f,
                "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}",
                "accuracy", "", "", acc, self.macro_avg.support
            )?;
        }
        if let Some(micro) = &self.micro_avg {
            write_row(f, micro, width)?;
        }
        write_row(f, &self.macro_avg, width)?;
        write_row(f, &self.weighted_avg, width)
    }
}
