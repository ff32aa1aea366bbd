//! Model persistence.
//!
//! A model file is a gzip stream holding one JSON document. Classes are
//! stored by their numeric codes and checked against the known categories
//! on load.

use crate::config::DecisionMethod;
use crate::error::{Error, Result};
use crate::ml::category::Category;
use crate::ml::feature_extractor::FeatureVector;
use crate::ml::svm::{BinaryMachine, MulticlassSvm};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Format tag written into every model file.
pub const MODEL_FORMAT: &str = "region-oxide-svm";

/// Current model file version.
pub const MODEL_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct ModelFile {
    format: String,
    version: u32,
    kernel: String,
    sigma: f64,
    decision: DecisionMethod,
    classes: Vec<u8>,
    machines: Vec<MachineRecord>,
}

#[derive(Serialize, Deserialize)]
struct MachineRecord {
    positive: u8,
    negative: u8,
    rho: f64,
    weights: Vec<f64>,
    support_vectors: Vec<FeatureVector>,
}

impl From<&MulticlassSvm> for ModelFile {
    fn from(model: &MulticlassSvm) -> Self {
        Self {
            format: MODEL_FORMAT.to_string(),
            version: MODEL_VERSION,
            kernel: "gaussian".to_string(),
            sigma: model.sigma(),
            decision: model.decision_method(),
            classes: model.classes().iter().map(|c| c.code()).collect(),
            machines: model
                .machines()
                .iter()
                .map(|m| MachineRecord {
                    positive: m.positive.code(),
                    negative: m.negative.code(),
                    rho: m.rho,
                    weights: m.weights.clone(),
                    support_vectors: m.support_vectors.clone(),
                })
                .collect(),
        }
    }
}

fn category(code: u8) -> Result<Category> {
    Category::from_code(code).map_err(|_| {
        Error::LabelSpaceMismatch(format!(
            "model class code {} is not one of the {} known categories",
            code,
            Category::COUNT
        ))
    })
}

impl TryFrom<ModelFile> for MulticlassSvm {
    type Error = Error;

    fn try_from(file: ModelFile) -> Result<Self> {
        if file.format != MODEL_FORMAT {
            return Err(Error::CorruptModel(format!("unexpected format '{}'", file.format)));
        }
        if file.version != MODEL_VERSION {
            return Err(Error::CorruptModel(format!(
                "unsupported model version {}",
                file.version
            )));
        }
        if file.kernel != "gaussian" {
            return Err(Error::CorruptModel(format!("unsupported kernel '{}'", file.kernel)));
        }

        let classes = file
            .classes
            .iter()
            .map(|&c| category(c))
            .collect::<Result<Vec<_>>>()?;
        let machines = file
            .machines
            .into_iter()
            .map(|m| {
                Ok(BinaryMachine {
                    positive: category(m.positive)?,
                    negative: category(m.negative)?,
                    support_vectors: m.support_vectors,
                    weights: m.weights,
                    rho: m.rho,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        MulticlassSvm::from_parts(file.sigma, file.decision, classes, machines)
    }
}

/// Write `model` to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_model(model: &MulticlassSvm, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, &ModelFile::from(model))?;
    let mut writer = encoder.finish()?;
    writer.flush()?;

    log::info!(
        "Saved model (sigma={}, {} classes, {} support vectors) to {}",
        model.sigma(),
        model.classes().len(),
        model.support_vector_count(),
        path.display()
    );
    Ok(())
}

/// Load a model written by [`save_model`].
///
/// # Errors
///
/// Returns an error if:
/// - The file doesn't exist ([`Error::ModelNotFound`])
/// - The stream is not a valid model ([`Error::CorruptModel`])
/// - A class code is not a known category ([`Error::LabelSpaceMismatch`])
pub fn load_model(path: &Path) -> Result<MulticlassSvm> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::ModelNotFound(path.to_path_buf()));
        },
        Err(e) => return Err(Error::Io(e)),
    };

    let decoder = GzDecoder::new(BufReader::new(file));
    let parsed: ModelFile = serde_json::from_reader(decoder)
        .map_err(|e| Error::CorruptModel(format!("{}: {}", path.display(), e)))?;
    let model = MulticlassSvm::try_from(parsed)?;

    log::info!(
        "Loaded model from {} (sigma={}, classes={:?})",
        path.display(),
        model.sigma(),
        model.classes()
    );
    Ok(model)
}
