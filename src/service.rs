//! Lookup + predict orchestration: validate id → find rows → preprocess → score twice.

use crate::config::ServiceConfig;
use crate::features::{PreprocessError, Preprocessor};
use crate::model::{load_scorer, ModelError, Scorer, ScoringError};
use crate::store::{RecordLookup, RecordStore, StoreError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Per-request failures. Display strings are what clients see.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("No institution passed")]
    EmptyCustomerId,
    #[error("No DB entry found")]
    NotFound,
    #[error("Cannot get prediction")]
    EmptyFeatures,
    #[error("Cannot get prediction")]
    Preprocess(#[source] PreprocessError),
    #[error("Cannot get prediction")]
    Scoring(#[source] ScoringError),
}

impl ScoreError {
    pub fn kind(&self) -> &'static str {
        match self {
            ScoreError::EmptyCustomerId => "validation",
            ScoreError::NotFound => "not_found",
            ScoreError::EmptyFeatures | ScoreError::Preprocess(_) => "empty_features",
            ScoreError::Scoring(_) => "scoring",
        }
    }
}

/// Startup failures; the process does not serve without its store and model.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("record store: {0}")]
    Store(#[from] StoreError),
    #[error("preprocessor: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("model: {0}")]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub customer_id: String,
    pub prediction: Vec<String>,
    /// Second `predict` call on the same features, not a probability
    pub proba: Vec<String>,
}

pub struct CreditService {
    store: Box<dyn RecordLookup>,
    preprocessor: Preprocessor,
    scorer: Arc<dyn Scorer>,
}

impl CreditService {
    pub fn new(
        store: impl RecordLookup + 'static,
        preprocessor: Preprocessor,
        scorer: Arc<dyn Scorer>,
    ) -> Self {
        Self {
            store: Box::new(store),
            preprocessor,
            scorer,
        }
    }

    /// Load snapshot, preprocessing artifacts and model; any failure aborts startup.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, StartupError> {
        let preprocessor = Preprocessor::from_config(&config.features)?;
        let store = RecordStore::load(&config.data_path, preprocessor.schema())?;
        let scorer = load_scorer(&config.model, preprocessor.schema().selected.len())?;
        Ok(Self::new(store, preprocessor, scorer))
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn score_customer(&self, customer_id: &str) -> Result<Prediction, ScoreError> {
        // Whitespace-only ids are rejected here too, not looked up as "No DB entry found".
        if customer_id.trim().is_empty() {
            return Err(ScoreError::EmptyCustomerId);
        }

        let rows = self.store.find(customer_id);
        if rows.is_empty() {
            return Err(ScoreError::NotFound);
        }

        let features = self.preprocessor.transform(&rows).map_err(|e| {
            warn!(customer_id, rows = rows.len(), error = %e, "preprocessing failed");
            ScoreError::Preprocess(e)
        })?;
        if features.is_empty() {
            return Err(ScoreError::EmptyFeatures);
        }

        let score = || {
            self.scorer.predict(&features).map_err(|e| {
                warn!(customer_id, backend = self.scorer.name(), error = %e, "scoring failed");
                ScoreError::Scoring(e)
            })
        };
        let prediction = score()?;
        let proba = score()?;

        info!(customer_id, rows = rows.len(), "customer scored");
        Ok(Prediction {
            customer_id: customer_id.to_string(),
            prediction,
            proba,
        })
    }
}
