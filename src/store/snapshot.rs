//! CSV snapshot loading. Only the id column and the schema's declared columns are kept.

use super::{CustomerRecord, FieldValue, RecordStore};
use crate::features::FeatureSchema;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reading snapshot: {0}")]
    Csv(#[from] csv::Error),
    #[error("snapshot has no column `{0}`")]
    MissingColumn(String),
    #[error("line {line}: column `{column}` is not numeric: {value:?}")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },
}

enum Slot {
    Category(String),
    Number(String),
}

fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(f64::NAN);
    }
    // Rust's float parser already accepts inf/-inf/infinity/nan in any case.
    raw.parse::<f64>().ok()
}

impl RecordStore {
    /// Load the snapshot at `path`. Fails if the file is unreadable or a declared column is absent.
    pub fn load(path: &Path, schema: &FeatureSchema) -> Result<Self, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_path(path)?;
        let headers = reader.headers()?.clone();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| StoreError::MissingColumn(name.to_string()))
        };

        let id_idx = position(&schema.id_column)?;
        let mut slots = Vec::new();
        for col in &schema.categorical {
            slots.push((position(col)?, Slot::Category(col.clone())));
        }
        for col in &schema.numeric {
            slots.push((position(col)?, Slot::Number(col.clone())));
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            let mut record = CustomerRecord::new(row.get(id_idx).unwrap_or_default());
            for (idx, slot) in &slots {
                let raw = row.get(*idx).unwrap_or_default();
                match slot {
                    Slot::Category(col) => {
                        let value = (!raw.is_empty()).then(|| raw.to_string());
                        record.set(col.clone(), FieldValue::Category(value));
                    }
                    Slot::Number(col) => {
                        let value = parse_number(raw).ok_or_else(|| StoreError::InvalidNumber {
                            line,
                            column: col.clone(),
                            value: raw.to_string(),
                        })?;
                        record.set(col.clone(), FieldValue::Number(value));
                    }
                }
            }
            records.push(record);
        }

        let store = Self::from_records(records);
        info!(
            path = %path.display(),
            rows = store.len(),
            customers = store.customer_count(),
            "record store loaded"
        );
        Ok(store)
    }
}
