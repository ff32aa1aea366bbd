// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Region Oxide
//!
//! Classification of PDF page regions into title, text, list, table and
//! image blocks from geometric and typographic signals.
//!
//! ## Core Features
//!
//! - **Feature Extraction**: 13 features per region from its glyphs, vector
//!   paths and images, total over degenerate input
//! - **Region Filter**: inclusive containment selection of page content
//! - **Training**: k-fold grid search over the Gaussian kernel width of a
//!   one-vs-one multiclass SVM, parallelised with rayon
//! - **Evaluation**: accuracy, confusion matrix, per-class precision, recall
//!   and F1 with undefined metrics surfaced as such
//! - **Inference**: persisted gzip models, classification of given or
//!   segmented regions
//! - **Datasets**: header-less CSV files, seeded sampling
//!
//! ## Architecture
//!
//! Any PDF library can feed the classifier by implementing
//! [`elements::PageContent`]. The same region filter and feature extractor
//! run when building training examples and at inference time.
//!
//! ## Quick Start
//!
//! ```no_run
//! use region_oxide::elements::Page;
//! use region_oxide::geometry::BoundingBox;
//! use region_oxide::ml::RegionClassifier;
//!
//! # fn main() -> region_oxide::Result<()> {
//! let classifier = RegionClassifier::load("model.gz".as_ref())?;
//! let page = Page::new(1, 612.0, 792.0);
//! for category in classifier.classify(&page, &[BoundingBox::new(72.0, 600.0, 540.0, 720.0)]) {
//!     println!("{}", category);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Page content model
pub mod elements;
pub mod geometry;

// Region candidates
pub mod layout;

// Classification
pub mod ml;

// Datasets and reports
pub mod dataset;

// Configuration
pub mod config;

// Re-exports
pub use config::{DecisionMethod, SigmaGrid, SvmParameters, TrainerConfig};
pub use dataset::LabeledDataset;
pub use error::{Error, Result};
pub use ml::{Category, FeatureVector, MulticlassSvm, RegionClassifier};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
