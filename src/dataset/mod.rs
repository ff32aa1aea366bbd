//! Labelled datasets: in-memory form, CSV files, reports and sampling.
//!
//! A dataset is an ordered sequence of (feature vector, category) pairs.
//! On disk it is a header-less CSV file with 13 feature columns followed by
//! the category code.

pub mod builder;
pub mod csv;
pub mod report;
pub mod sampling;

pub use builder::{examples_from_page, AnnotatedRegion};
pub use csv::{read_dataset, write_dataset};
pub use report::{write_report, ReportFormat};

use crate::error::{Error, Result};
use crate::ml::category::Category;
use crate::ml::feature_extractor::FeatureVector;

/// Feature vectors with their gold categories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledDataset {
    /// Feature vectors
    pub inputs: Vec<FeatureVector>,
    /// Gold category of each feature vector
    pub labels: Vec<Category>,
}

impl LabeledDataset {
    /// Empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dataset from parallel vectors.
    pub fn from_parts(inputs: Vec<FeatureVector>, labels: Vec<Category>) -> Result<Self> {
        if inputs.len() != labels.len() {
            return Err(Error::LengthMismatch {
                inputs: inputs.len(),
                labels: labels.len(),
            });
        }
        Ok(Self { inputs, labels })
    }

    /// Dataset from raw feature rows.
    ///
    /// Fails with [`Error::MalformedRow`] (1-based row number) on the first
    /// row that does not hold exactly 13 values.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Vec<f64>, Category)>,
    {
        let mut dataset = Self::new();
        for (i, (row, label)) in rows.into_iter().enumerate() {
            let features = FeatureVector::try_from(row.as_slice()).map_err(|e| match e {
                Error::MalformedRow {
                    expected, found, ..
                } => Error::MalformedRow {
                    line: i + 1,
                    expected,
                    found,
                },
                other => other,
            })?;
            dataset.push(features, label);
        }
        Ok(dataset)
    }

    /// Append one example.
    pub fn push(&mut self, features: FeatureVector, label: Category) {
        self.inputs.push(features);
        self.labels.push(label);
    }

    /// Append every example of `other`.
    pub fn extend(&mut self, other: LabeledDataset) {
        self.inputs.extend(other.inputs);
        self.labels.extend(other.labels);
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// True when there are no examples.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Examples as pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&FeatureVector, Category)> {
        self.inputs.iter().zip(self.labels.iter().copied())
    }

    /// The first `n` examples (all of them when fewer).
    pub fn take(&self, n: usize) -> LabeledDataset {
        let n = n.min(self.len());
        Self {
            inputs: self.inputs[..n].to_vec(),
            labels: self.labels[..n].to_vec(),
        }
    }

    /// `n` distinct examples drawn at random, reproducible by `seed`.
    pub fn sample(&self, seed: u64, n: usize) -> Result<LabeledDataset> {
        let indices = sampling::sample_indices(seed, n, 0..self.len())?;
        Ok(Self {
            inputs: indices.iter().map(|&i| self.inputs[i]).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        })
    }

    /// Distinct categories present, in code order.
    pub fn distinct_labels(&self) -> Vec<Category> {
        let mut labels = self.labels.clone();
        labels.sort();
        labels.dedup();
        labels
    }

    /// Number of examples per category, indexed by code.
    pub fn class_counts(&self) -> [usize; Category::COUNT] {
        let mut counts = [0; Category::COUNT];
        for label in &self.labels {
            counts[label.index()] += 1;
        }
        counts
    }
}
