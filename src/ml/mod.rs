//! Region classification with a one-vs-one Gaussian SVM.
//!
//! This module provides:
//! - Feature extraction from region content
//! - Selection of the content inside a region
//! - Grid-search training and evaluation
//! - Model persistence and inference
//!
//! # Example
//!
//! ```no_run
//! use region_oxide::config::TrainerConfig;
//! use region_oxide::dataset::read_dataset;
//! use region_oxide::ml::{Evaluator, ModelTrainer};
//!
//! # fn main() -> region_oxide::Result<()> {
//! let train = read_dataset("train.csv".as_ref(), None)?;
//! let test = read_dataset("test.csv".as_ref(), None)?;
//!
//! let outcome = ModelTrainer::new(TrainerConfig::new()).grid_search_train(&train.inputs, &train.labels)?;
//! let report = Evaluator::new().evaluate(&outcome.model, &test.inputs, &test.labels)?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

pub mod category;
pub mod classifier;
pub mod evaluator;
pub mod feature_extractor;
pub mod model_loader;
pub mod region_filter;
pub mod svm;
pub mod trainer;

pub use category::Category;
pub use classifier::RegionClassifier;
pub use evaluator::{ClassMetrics, ConfusionMatrix, EvaluationReport, Evaluator};
pub use feature_extractor::{FeatureExtractor, FeatureVector, FEATURE_COUNT};
pub use model_loader::{load_model, save_model};
pub use svm::MulticlassSvm;
pub use trainer::{GridSearchMetrics, ModelTrainer, TrainingOutcome};
