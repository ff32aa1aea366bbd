//! Configuration for model training and inference.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the pairwise machines of a one-vs-one model are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecisionMethod {
    /// Decision DAG: repeatedly duel the first and last remaining classes
    /// and drop the loser.
    #[default]
    Elimination,
    /// Every pairwise machine votes; most votes wins, ties go to the lower
    /// category code.
    Voting,
}

/// Hyperparameters of a single model fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvmParameters {
    /// Gaussian kernel width σ.
    pub sigma: f64,

    /// Soft-margin weight C.
    pub complexity: f64,

    /// Combination of pairwise decisions.
    pub decision: DecisionMethod,
}

impl SvmParameters {
    /// Parameters with the given kernel width and default C.
    pub fn new(sigma: f64) -> Self {
        Self {
            sigma,
            complexity: 1.0,
            decision: DecisionMethod::default(),
        }
    }

    /// Set the soft-margin weight.
    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = complexity;
        self
    }

    /// Set the decision method.
    pub fn with_decision(mut self, decision: DecisionMethod) -> Self {
        self.decision = decision;
        self
    }

    /// Check that σ and C are positive and finite.
    pub fn validate(&self) -> Result<()> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "sigma must be positive, got {}",
                self.sigma
            )));
        }
        if !(self.complexity.is_finite() && self.complexity > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "complexity must be positive, got {}",
                self.complexity
            )));
        }
        Ok(())
    }
}

/// Candidate kernel widths for grid search.
#[derive(Debug, Clone, PartialEq)]
pub struct SigmaGrid {
    values: Vec<f64>,
}

impl Default for SigmaGrid {
    fn default() -> Self {
        Self {
            values: Self::steps(1e-8, 3.0, 0.5),
        }
    }
}

impl SigmaGrid {
    /// Values `from, from + step, ...` strictly below `to`.
    ///
    /// # Examples
    ///
    /// ```
    /// use region_oxide::config::SigmaGrid;
    ///
    /// let grid = SigmaGrid::range(0.5, 2.0, 0.5).unwrap();
    /// assert_eq!(grid.values(), &[0.5, 1.0, 1.5]);
    /// ```
    pub fn range(from_inclusive: f64, to_exclusive: f64, step: f64) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::InvalidConfig(format!("grid step must be positive, got {}", step)));
        }
        Self::from_values(Self::steps(from_inclusive, to_exclusive, step))
    }

    /// Explicit list of values.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::InvalidConfig("sigma grid is empty".to_string()));
        }
        if let Some(bad) = values.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
            return Err(Error::InvalidConfig(format!("sigma must be positive, got {}", bad)));
        }
        Ok(Self { values })
    }

    /// Grid values in search order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn steps(from: f64, to: f64, step: f64) -> Vec<f64> {
        (0..)
            .map(|i| from + i as f64 * step)
            .take_while(|v| *v < to)
            .collect()
    }
}

/// Training pipeline configuration.
///
/// # Example
///
/// ```
/// use region_oxide::config::TrainerConfig;
///
/// let config = TrainerConfig::new()
///     .with_folds(5)
///     .with_seed(42)
///     .with_parallelism(Some(1));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Kernel widths tried by grid search.
    pub sigma_grid: SigmaGrid,

    /// Number of cross-validation folds.
    pub folds: usize,

    /// Leading rows used for cross-validation.
    pub max_cross_validation_rows: usize,

    /// Leading rows used for the final fit.
    ///
    /// Each pairwise machine holds a dense kernel matrix over the rows of
    /// its two classes, 8 bytes per entry. At the default cap a dominant
    /// pair of 30000 rows needs about 7.2 GB; lower the cap on smaller
    /// machines.
    pub max_training_rows: usize,

    /// Seed for fold assignment.
    pub seed: u64,

    /// Worker threads for grid search (`None` = rayon default).
    pub parallelism: Option<usize>,

    /// Soft-margin weight C.
    pub complexity: f64,

    /// Decision method stored in trained models.
    pub decision: DecisionMethod,

    /// Where to write the trained model, if anywhere.
    pub model_path: Option<PathBuf>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainerConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            sigma_grid: SigmaGrid::default(),
            folds: 10,
            max_cross_validation_rows: 5_000,
            max_training_rows: 40_000,
            seed: 0,
            parallelism: None,
            complexity: 1.0,
            decision: DecisionMethod::default(),
            model_path: None,
        }
    }

    /// Set the sigma grid.
    pub fn with_sigma_grid(mut self, grid: SigmaGrid) -> Self {
        self.sigma_grid = grid;
        self
    }

    /// Set the number of folds.
    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    /// Set the cross-validation row cap.
    pub fn with_max_cross_validation_rows(mut self, rows: usize) -> Self {
        self.max_cross_validation_rows = rows;
        self
    }

    /// Set the final-fit row cap.
    pub fn with_max_training_rows(mut self, rows: usize) -> Self {
        self.max_training_rows = rows;
        self
    }

    /// Set the fold assignment seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the grid search thread count.
    pub fn with_parallelism(mut self, threads: Option<usize>) -> Self {
        self.parallelism = threads;
        self
    }

    /// Set the soft-margin weight.
    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = complexity;
        self
    }

    /// Set the decision method.
    pub fn with_decision(mut self, decision: DecisionMethod) -> Self {
        self.decision = decision;
        self
    }

    /// Write the trained model to `path`.
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Fit parameters for a given σ.
    pub fn svm_parameters(&self, sigma: f64) -> SvmParameters {
        SvmParameters::new(sigma)
            .with_complexity(self.complexity)
            .with_decision(self.decision)
    }

    /// Check all values are in range.
    pub fn validate(&self) -> Result<()> {
        if self.folds < 2 {
            return Err(Error::InvalidConfig(format!(
                "at least 2 folds required, got {}",
                self.folds
            )));
        }
        if self.max_cross_validation_rows == 0 || self.max_training_rows == 0 {
            return Err(Error::InvalidConfig("row caps must be positive".to_string()));
        }
        if self.parallelism == Some(0) {
            return Err(Error::InvalidConfig("parallelism must be at least 1".to_string()));
        }
        self.svm_parameters(1.0).validate()
    }
}
