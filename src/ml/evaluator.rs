//! Model evaluation: accuracy, confusion matrix and per-class metrics.
//!
//! The confusion matrix is indexed `[predicted][gold]`. Precision of a
//! class is read along its row, recall along its column. Metrics whose
//! denominator is zero are undefined and reported as `None`.

use crate::error::{Error, Result};
use crate::ml::category::Category;
use crate::ml::feature_extractor::FeatureVector;
use crate::ml::svm::MulticlassSvm;
use serde::Serialize;
use std::fmt;

const N: usize = Category::COUNT;

/// Counts of predicted versus gold categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    counts: [[usize; N]; N],
}

impl ConfusionMatrix {
    /// Empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Matrix with the given `[predicted][gold]` counts.
    pub fn from_counts(counts: [[usize; N]; N]) -> Self {
        Self { counts }
    }

    /// Build from parallel predicted and gold sequences.
    pub fn from_pairs(predicted: &[Category], gold: &[Category]) -> Result<Self> {
        if predicted.len() != gold.len() {
            return Err(Error::LengthMismatch {
                inputs: predicted.len(),
                labels: gold.len(),
            });
        }
        let mut matrix = Self::new();
        for (p, g) in predicted.iter().zip(gold) {
            matrix.record(*p, *g);
        }
        Ok(matrix)
    }

    /// Count one prediction.
    pub fn record(&mut self, predicted: Category, gold: Category) {
        self.counts[predicted.index()][gold.index()] += 1;
    }

    /// Count of examples predicted as `predicted` whose gold label is `gold`.
    pub fn get(&self, predicted: Category, gold: Category) -> usize {
        self.counts[predicted.index()][gold.index()]
    }

    /// Raw `[predicted][gold]` counts.
    pub fn counts(&self) -> &[[usize; N]; N] {
        &self.counts
    }

    /// Number of examples predicted as `category`.
    pub fn row_total(&self, category: Category) -> usize {
        self.counts[category.index()].iter().sum()
    }

    /// Number of examples whose gold label is `category`.
    pub fn column_total(&self, category: Category) -> usize {
        self.counts.iter().map(|row| row[category.index()]).sum()
    }

    /// Total number of examples.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Number of correct predictions.
    pub fn trace(&self) -> usize {
        (0..N).map(|i| self.counts[i][i]).sum()
    }

    /// Fraction of correct predictions, `None` for an empty matrix.
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.trace(), self.total())
    }

    /// True positives over everything predicted as `category`.
    pub fn precision(&self, category: Category) -> Option<f64> {
        ratio(self.get(category, category), self.row_total(category))
    }

    /// True positives over everything labelled `category`.
    pub fn recall(&self, category: Category) -> Option<f64> {
        ratio(self.get(category, category), self.column_total(category))
    }

    /// Harmonic mean of precision and recall.
    ///
    /// `None` when either is undefined or both are zero.
    pub fn f1(&self, category: Category) -> Option<f64> {
        let p = self.precision(category)?;
        let r = self.recall(category)?;
        if p + r == 0.0 {
            None
        } else {
            Some(2.0 * p * r / (p + r))
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

fn mean_defined(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let defined: Vec<f64> = values.flatten().collect();
    if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }
}

/// Metrics of one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    /// Category
    pub category: Category,
    /// Precision, if defined
    pub precision: Option<f64>,
    /// Recall, if defined
    pub recall: Option<f64>,
    /// F1 score, if defined
    pub f1: Option<f64>,
    /// Number of examples with this gold label
    pub support: usize,
}

/// Result of evaluating a model on a labelled dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Correct over total
    pub accuracy: f64,
    /// Number of evaluated examples
    pub total: usize,
    /// Number of correct predictions
    pub correct: usize,
    /// `[predicted][gold]` counts
    pub confusion_matrix: ConfusionMatrix,
    /// Metrics per category, in code order
    pub per_class: Vec<ClassMetrics>,
    /// Mean of the defined precisions
    pub macro_precision: Option<f64>,
    /// Mean of the defined recalls
    pub macro_recall: Option<f64>,
    /// Mean of the defined F1 scores
    pub macro_f1: Option<f64>,
    /// RFC 3339 creation time
    pub generated_at: String,
}

impl EvaluationReport {
    /// Derive every metric from a confusion matrix.
    ///
    /// Fails with [`Error::EmptyDataset`] when the matrix holds no counts.
    pub fn from_matrix(matrix: ConfusionMatrix) -> Result<Self> {
        let accuracy = matrix.accuracy().ok_or(Error::EmptyDataset)?;
        let per_class: Vec<ClassMetrics> = Category::ALL
            .iter()
            .map(|&category| ClassMetrics {
                category,
                precision: matrix.precision(category),
                recall: matrix.recall(category),
                f1: matrix.f1(category),
                support: matrix.column_total(category),
            })
            .collect();

        Ok(Self {
            accuracy,
            total: matrix.total(),
            correct: matrix.trace(),
            macro_precision: mean_defined(per_class.iter().map(|m| m.precision)),
            macro_recall: mean_defined(per_class.iter().map(|m| m.recall)),
            macro_f1: mean_defined(per_class.iter().map(|m| m.f1)),
            confusion_matrix: matrix,
            per_class,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Metrics of one category.
    pub fn class(&self, category: Category) -> &ClassMetrics {
        &self.per_class[category.index()]
    }
}

fn metric(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.3}", v))
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Model accuracy = {:.3}% ({} of {})",
            self.accuracy * 100.0,
            self.correct,
            self.total
        )?;
        writeln!(f)?;

        write!(f, "{:>8}", "pred\\gold")?;
        for c in Category::ALL {
            write!(f, "\t{}", c)?;
        }
        writeln!(f)?;
        for p in Category::ALL {
            write!(f, "{:>8}", p.name())?;
            for g in Category::ALL {
                write!(f, "\t{}", self.confusion_matrix.get(p, g))?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;

        for m in &self.per_class {
            writeln!(f, "{}:", m.category)?;
            writeln!(f, "Precision: {}", metric(m.precision))?;
            writeln!(f, "Recall:    {}", metric(m.recall))?;
            writeln!(f, "F1 score:  {}", metric(m.f1))?;
            writeln!(f)?;
        }

        writeln!(
            f,
            "Macro: precision {}, recall {}, F1 {}",
            metric(self.macro_precision),
            metric(self.macro_recall),
            metric(self.macro_f1)
        )
    }
}

/// Runs a model over a labelled dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    /// Create an evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Predict every input and compare with `labels`.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs are empty or the lengths differ.
    pub fn evaluate(
        &self,
        model: &MulticlassSvm,
        inputs: &[FeatureVector],
        labels: &[Category],
    ) -> Result<EvaluationReport> {
        if inputs.len() != labels.len() {
            return Err(Error::LengthMismatch {
                inputs: inputs.len(),
                labels: labels.len(),
            });
        }
        if inputs.is_empty() {
            return Err(Error::EmptyDataset);
        }

        log::info!("Evaluating model on {} examples", inputs.len());
        let predicted = model.decide_all(inputs);
        let report = EvaluationReport::from_matrix(ConfusionMatrix::from_pairs(&predicted, labels)?)?;
        log::info!("Accuracy {:.5}", report.accuracy);
        Ok(report)
    }
}
