//! Model training with grid-search cross-validation.
//!
//! The kernel width σ is chosen by k-fold cross-validation over a grid of
//! candidates, scoring each with the zero-one loss. The winner is refitted
//! on a larger leading slice of the data and optionally persisted.

use crate::config::TrainerConfig;
use crate::dataset::sampling::shuffle_indices;
use crate::error::{Error, Result};
use crate::ml::category::Category;
use crate::ml::feature_extractor::FeatureVector;
use crate::ml::model_loader::save_model;
use crate::ml::svm::MulticlassSvm;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::collections::BTreeSet;

/// Cross-validation summary of one σ candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialResult {
    /// Kernel width
    pub sigma: f64,
    /// Mean zero-one error on the training splits
    pub training_error_mean: f64,
    /// Sample variance of the training errors
    pub training_error_variance: f64,
    /// Mean zero-one error on the validation folds
    pub validation_error_mean: f64,
    /// Sample variance of the validation errors
    pub validation_error_variance: f64,
}

/// Grid search report.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSearchMetrics {
    /// Winning trial
    pub best: TrialResult,
    /// Every completed trial in grid order
    pub trials: Vec<TrialResult>,
    /// Rows used for cross-validation
    pub cross_validation_rows: usize,
    /// Number of folds
    pub folds: usize,
}

/// Result of a training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Final model
    pub model: MulticlassSvm,
    /// Kernel width used for the final model
    pub sigma: f64,
    /// Grid search report, when σ was searched
    pub metrics: Option<GridSearchMetrics>,
}

/// Trains region classifiers.
///
/// # Example
///
/// ```no_run
/// use region_oxide::config::TrainerConfig;
/// use region_oxide::dataset::read_dataset;
/// use region_oxide::ml::ModelTrainer;
///
/// # fn main() -> region_oxide::Result<()> {
/// let data = read_dataset("features.csv".as_ref(), None)?;
/// let trainer = ModelTrainer::new(TrainerConfig::new().with_model_path("model.gz"));
/// let outcome = trainer.grid_search_train(&data.inputs, &data.labels)?;
/// println!("sigma = {}", outcome.sigma);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainerConfig,
}

impl ModelTrainer {
    /// Create a trainer.
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Trainer configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Search σ by cross-validation, then fit and persist the final model.
    pub fn grid_search_train(
        &self,
        inputs: &[FeatureVector],
        labels: &[Category],
    ) -> Result<TrainingOutcome> {
        self.check_inputs(inputs, labels)?;

        let cv_rows = inputs.len().min(self.config.max_cross_validation_rows);
        log::info!(
            "Grid search over {} sigma values, {} folds, {} rows",
            self.config.sigma_grid.values().len(),
            self.config.folds,
            cv_rows
        );
        let metrics = self.cross_validate(&inputs[..cv_rows], &labels[..cv_rows])?;
        let sigma = metrics.best.sigma;
        log::info!(
            "Best sigma={} (validation error {:.5} ± {:.5})",
            sigma,
            metrics.best.validation_error_mean,
            metrics.best.validation_error_variance.sqrt()
        );

        let model = self.fit_final(inputs, labels, sigma)?;
        Ok(TrainingOutcome {
            model,
            sigma,
            metrics: Some(metrics),
        })
    }

    /// Fit and persist a model with a caller-supplied σ.
    pub fn fixed_sigma_train(
        &self,
        inputs: &[FeatureVector],
        labels: &[Category],
        sigma: f64,
    ) -> Result<TrainingOutcome> {
        self.check_inputs(inputs, labels)?;
        self.config.svm_parameters(sigma).validate()?;
        let model = self.fit_final(inputs, labels, sigma)?;
        Ok(TrainingOutcome {
            model,
            sigma,
            metrics: None,
        })
    }

    fn check_inputs(&self, inputs: &[FeatureVector], labels: &[Category]) -> Result<()> {
        self.config.validate()?;
        if inputs.len() != labels.len() {
            return Err(Error::LengthMismatch {
                inputs: inputs.len(),
                labels: labels.len(),
            });
        }
        if inputs.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let distinct = labels.iter().collect::<BTreeSet<_>>().len();
        if distinct < 2 {
            return Err(Error::InsufficientData { distinct });
        }
        Ok(())
    }

    fn fit_final(
        &self,
        inputs: &[FeatureVector],
        labels: &[Category],
        sigma: f64,
    ) -> Result<MulticlassSvm> {
        let rows = inputs.len().min(self.config.max_training_rows);
        log::info!("Fitting final model on {} rows with sigma={}", rows, sigma);
        let model =
            MulticlassSvm::fit(&inputs[..rows], &labels[..rows], &self.config.svm_parameters(sigma))?;

        if let Some(path) = &self.config.model_path {
            save_model(&model, path)?;
        }
        Ok(model)
    }

    fn cross_validate(
        &self,
        inputs: &[FeatureVector],
        labels: &[Category],
    ) -> Result<GridSearchMetrics> {
        let folds = self.config.folds;
        if folds > inputs.len() {
            return Err(Error::Training(format!(
                "cannot split {} rows into {} folds",
                inputs.len(),
                folds
            )));
        }

        // fold_of[row] = fold index
        let mut fold_of = vec![0; inputs.len()];
        for (position, row) in shuffle_indices(self.config.seed, inputs.len()).into_iter().enumerate() {
            fold_of[row] = position % folds;
        }

        let sigmas = self.config.sigma_grid.values();
        let units: Vec<(usize, usize)> = (0..sigmas.len())
            .flat_map(|s| (0..folds).map(move |f| (s, f)))
            .collect();

        let run = || -> Vec<Result<FoldErrors>> {
            units
                .par_iter()
                .map(|&(s, f)| self.run_fold(inputs, labels, &fold_of, f, sigmas[s]))
                .collect()
        };
        let results = match self.config.parallelism {
            Some(threads) => ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::Training(e.to_string()))?
                .install(run),
            None => run(),
        };

        let mut trials = Vec::new();
        for (s, sigma) in sigmas.iter().enumerate() {
            let fold_results = &results[s * folds..(s + 1) * folds];
            let mut training = Vec::with_capacity(folds);
            let mut validation = Vec::with_capacity(folds);
            let mut failure = None;
            for r in fold_results {
                match r {
                    Ok(e) => {
                        training.push(e.training);
                        validation.push(e.validation);
                    },
                    Err(e) => {
                        failure = Some(e);
                        break;
                    },
                }
            }
            if let Some(e) = failure {
                log::warn!("Discarding sigma={}: {}", sigma, e);
                continue;
            }

            let (training_error_mean, training_error_variance) = mean_and_variance(&training);
            let (validation_error_mean, validation_error_variance) = mean_and_variance(&validation);
            log::debug!(
                "sigma={}: training error {:.5}, validation error {:.5}",
                sigma,
                training_error_mean,
                validation_error_mean
            );
            trials.push(TrialResult {
                sigma: *sigma,
                training_error_mean,
                training_error_variance,
                validation_error_mean,
                validation_error_variance,
            });
        }

        let best = best_trial(&trials)
            .ok_or_else(|| Error::Training("every grid search trial failed".to_string()))?;

        Ok(GridSearchMetrics {
            best,
            trials,
            cross_validation_rows: inputs.len(),
            folds,
        })
    }

    fn run_fold(
        &self,
        inputs: &[FeatureVector],
        labels: &[Category],
        fold_of: &[usize],
        fold: usize,
        sigma: f64,
    ) -> Result<FoldErrors> {
        let mut train_x = Vec::new();
        let mut train_y = Vec::new();
        let mut valid_x = Vec::new();
        let mut valid_y = Vec::new();
        for (i, &f) in fold_of.iter().enumerate() {
            if f == fold {
                valid_x.push(inputs[i]);
                valid_y.push(labels[i]);
            } else {
                train_x.push(inputs[i]);
                train_y.push(labels[i]);
            }
        }

        let model = MulticlassSvm::fit(&train_x, &train_y, &self.config.svm_parameters(sigma))?;
        Ok(FoldErrors {
            training: zero_one_loss(&model, &train_x, &train_y),
            validation: zero_one_loss(&model, &valid_x, &valid_y),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct FoldErrors {
    training: f64,
    validation: f64,
}

/// Trial with the lowest mean validation error; ties go to the smaller sigma.
fn best_trial(trials: &[TrialResult]) -> Option<TrialResult> {
    trials
        .iter()
        .min_by(|a, b| {
            a.validation_error_mean
                .total_cmp(&b.validation_error_mean)
                .then(a.sigma.total_cmp(&b.sigma))
        })
        .cloned()
}

/// Fraction of misclassified examples, 0 for no examples.
pub fn zero_one_loss(model: &MulticlassSvm, inputs: &[FeatureVector], labels: &[Category]) -> f64 {
    if inputs.is_empty() {
        return 0.0;
    }
    let wrong = inputs
        .iter()
        .zip(labels)
        .filter(|(x, y)| model.decide(x) != **y)
        .count();
    wrong as f64 / inputs.len() as f64
}

/// Mean and unbiased sample variance; variance is 0 for fewer than two
/// values.
fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}
