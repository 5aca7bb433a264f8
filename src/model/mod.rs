//! Scoring functions: pre-built classifier artifacts behind a common `Scorer` trait.

mod forest;
mod onnx;

pub use forest::{ForestScorer, Node, Tree};
pub use onnx::OnnxScorer;

use crate::config::{ModelConfig, ModelKind};
use crate::features::FeatureFrame;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("expected {expected} feature columns, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },
    #[error("feature column {index} is `{actual}`, model was fit on `{expected}`")]
    FeatureName {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("model produced no output")]
    EmptyOutput,
    #[error("class index {0} outside the configured classes")]
    UnknownClass(i64),
    #[error("inference backend: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("model artifact format: {0}")]
    Format(#[from] serde_json::Error),
    #[error("invalid model: {0}")]
    Invalid(String),
    #[error("onnx runtime: {0}")]
    Onnx(#[from] ort::Error),
}

/// A fitted classifier. Deterministic: equal frames give equal labels.
pub trait Scorer: Send + Sync {
    /// One class label per frame row.
    fn predict(&self, features: &FeatureFrame) -> Result<Vec<String>, ScoringError>;

    /// Short backend name for logs
    fn name(&self) -> &str;
}

/// SHA-256 of the artifact bytes, hex encoded.
pub fn fingerprint(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, ModelError> {
    std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Load the configured artifact. A missing or malformed file is an error, never a no-op scorer.
pub fn load_scorer(config: &ModelConfig, n_features: usize) -> Result<Arc<dyn Scorer>, ModelError> {
    let bytes = read_artifact(&config.path)?;
    let digest = fingerprint(&bytes);
    let scorer: Arc<dyn Scorer> = match config.kind {
        ModelKind::Forest => {
            let forest = ForestScorer::from_slice(&bytes)?;
            if forest.n_features() != n_features {
                return Err(ModelError::Invalid(format!(
                    "forest expects {} features, pipeline produces {}",
                    forest.n_features(),
                    n_features
                )));
            }
            Arc::new(forest)
        }
        ModelKind::Onnx => Arc::new(OnnxScorer::load(
            &config.path,
            n_features,
            config.classes.clone(),
        )?),
    };
    info!(
        path = %config.path.display(),
        backend = scorer.name(),
        sha256 = %digest,
        "scoring model loaded"
    );
    Ok(scorer)
}
