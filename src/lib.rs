//! Credit scoring: customer lookup + pre-built model serving, and synthetic dataset generation.
//!
//! Modular structure:
//! - [`store`] - Read-only customer record snapshot, keyed by customer id
//! - [`features`] - Impute / one-hot / min-max / projection preprocessing
//! - [`model`] - Scoring artifacts (JSON random forest, ONNX)
//! - [`service`] - Lookup + predict orchestration and its error taxonomy
//! - [`server`] - HTTP routes
//! - [`generator`] - Synthetic demographics and event datasets
//! - [`logging`] - Structured JSON logging

pub mod config;
pub mod features;
pub mod generator;
pub mod logging;
pub mod model;
pub mod server;
pub mod service;
pub mod store;

pub use config::ServiceConfig;
pub use features::{FeatureFrame, FeatureSchema, Preprocessor};
pub use logging::StructuredLogger;
pub use model::{ForestScorer, Scorer};
pub use service::{CreditService, Prediction, ScoreError};
pub use store::{CustomerRecord, RecordStore};
