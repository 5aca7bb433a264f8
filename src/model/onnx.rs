//! ONNX Runtime inference for exported classifiers. Input: [rows, n_features] f32,
//! output 0: i64 class index per row, mapped through the configured class labels.
//! The runtime library is loaded dynamically (`ORT_DYLIB_PATH`).

use super::{ModelError, Scorer, ScoringError};
use crate::features::FeatureFrame;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::tensor::TensorElementType;
use ort::value::{Tensor, ValueType};
use std::path::Path;
use tracing::debug;

pub struct OnnxScorer {
    session: Session,
    label_output: String,
    n_features: usize,
    classes: Vec<String>,
}

impl OnnxScorer {
    /// Load model from path. `classes[i]` labels class index `i`; empty means raw indices.
    /// Fails unless the first output is an int64 label tensor.
    pub fn load(path: &Path, n_features: usize, classes: Vec<String>) -> Result<Self, ModelError> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level1)?
            .with_intra_threads(1)?
            .commit_from_file(path)?;

        let output = session
            .outputs
            .first()
            .ok_or_else(|| ModelError::Invalid("onnx model has no outputs".into()))?;
        let element = match &output.output_type {
            ValueType::Tensor { ty, .. } => Some(*ty),
            _ => None,
        };
        check_label_output(&output.name, element)?;

        debug!(
            inputs = session.inputs.len(),
            label_output = %output.name,
            "onnx session ready"
        );

        let label_output = output.name.clone();
        Ok(Self {
            session,
            label_output,
            n_features,
            classes,
        })
    }
}

/// Class labels must come out as int64; string-label exports are rejected at load.
fn check_label_output(name: &str, element: Option<TensorElementType>) -> Result<(), ModelError> {
    match element {
        Some(TensorElementType::Int64) => Ok(()),
        other => Err(ModelError::Invalid(format!(
            "onnx output `{name}` must be an int64 tensor, found {other:?}"
        ))),
    }
}

fn label(classes: &[String], index: i64) -> Result<String, ScoringError> {
    if classes.is_empty() {
        return Ok(index.to_string());
    }
    usize::try_from(index)
        .ok()
        .and_then(|i| classes.get(i))
        .cloned()
        .ok_or(ScoringError::UnknownClass(index))
}

fn backend(e: ort::Error) -> ScoringError {
    ScoringError::Backend(e.to_string())
}

impl Scorer for OnnxScorer {
    fn predict(&self, features: &FeatureFrame) -> Result<Vec<String>, ScoringError> {
        if features.n_cols() != self.n_features {
            return Err(ScoringError::SchemaMismatch {
                expected: self.n_features,
                actual: features.n_cols(),
            });
        }
        let shape = vec![features.n_rows() as i64, features.n_cols() as i64];
        let data: Vec<f32> = features.values().iter().map(|&v| v as f32).collect();
        let input = Tensor::from_array((shape, data)).map_err(backend)?;
        let inputs = ort::inputs![input].map_err(backend)?;
        let outputs = self.session.run(inputs).map_err(backend)?;

        let labels = outputs
            .get(self.label_output.as_str())
            .ok_or(ScoringError::EmptyOutput)?;
        let (_, indices) = labels.try_extract_raw_tensor::<i64>().map_err(backend)?;
        indices.iter().map(|&i| label(&self.classes, i)).collect()
    }

    fn name(&self) -> &str {
        "onnx"
    }
}
