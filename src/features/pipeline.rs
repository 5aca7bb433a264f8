//! Preprocessing pipeline: records → impute → one-hot → min-max → selected columns.

use super::encode::{impute, observed_levels, one_hot};
use super::{FeatureFrame, FeatureSchema, MinMaxScaler, PreprocessError};
use crate::config::{FeaturesConfig, ScalingMode};
use crate::store::CustomerRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Category vocabulary and scaler learned once from a reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTransform {
    pub categorical: Vec<String>,
    pub numeric: Vec<String>,
    /// Sorted levels per categorical column; the first is the dropped reference level
    pub levels: Vec<Vec<String>>,
    /// Encoded column names, aligned with `scaler`
    pub columns: Vec<String>,
    pub scaler: MinMaxScaler,
}

impl FittedTransform {
    pub fn fit(rows: &[&CustomerRecord], schema: &FeatureSchema) -> Result<Self, PreprocessError> {
        if rows.is_empty() {
            return Err(PreprocessError::EmptyFit);
        }
        let imputed = impute(rows, schema)?;
        let levels = observed_levels(&imputed);
        let (columns, values) = one_hot(&imputed, schema, &levels);
        Ok(Self {
            categorical: schema.categorical.clone(),
            numeric: schema.numeric.clone(),
            levels,
            columns,
            scaler: MinMaxScaler::fit(&values),
        })
    }

    pub fn load(path: &Path) -> Result<Self, PreprocessError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), PreprocessError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn check_compatible(&self, schema: &FeatureSchema) -> Result<(), PreprocessError> {
        if self.categorical != schema.categorical {
            return Err(PreprocessError::IncompatibleTransform(
                "categorical columns differ".into(),
            ));
        }
        if self.numeric != schema.numeric {
            return Err(PreprocessError::IncompatibleTransform(
                "numeric columns differ".into(),
            ));
        }
        if self.levels.len() != self.categorical.len() || self.scaler.width() != self.columns.len()
        {
            return Err(PreprocessError::IncompatibleTransform(
                "artifact is internally inconsistent".into(),
            ));
        }
        if let Some(missing) = schema.selected.iter().find(|s| !self.columns.contains(s)) {
            return Err(PreprocessError::IncompatibleTransform(format!(
                "selected column `{missing}` is never produced"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum Scaling {
    /// Vocabulary and min/max taken from the rows being transformed
    Batch,
    Fitted(FittedTransform),
}

#[derive(Debug)]
pub struct Preprocessor {
    schema: FeatureSchema,
    scaling: Scaling,
}

impl Preprocessor {
    pub fn new(schema: FeatureSchema, scaling: Scaling) -> Result<Self, PreprocessError> {
        if let Scaling::Fitted(t) = &scaling {
            t.check_compatible(&schema)?;
        }
        Ok(Self { schema, scaling })
    }

    pub fn batch(schema: FeatureSchema) -> Self {
        Self {
            schema,
            scaling: Scaling::Batch,
        }
    }

    pub fn from_config(config: &FeaturesConfig) -> Result<Self, PreprocessError> {
        let schema = FeatureSchema::from(config);
        let scaling = match config.scaling.mode {
            ScalingMode::Batch => Scaling::Batch,
            ScalingMode::Fitted => {
                let path = config
                    .scaling
                    .transform_path
                    .as_deref()
                    .ok_or(PreprocessError::MissingTransformPath)?;
                let t = FittedTransform::load(path)?;
                info!(path = %path.display(), columns = t.columns.len(), "fitted transform loaded");
                Scaling::Fitted(t)
            }
        };
        Self::new(schema, scaling)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn scaling(&self) -> &Scaling {
        &self.scaling
    }

    /// One output row per input row, with exactly the selected columns. Empty input
    /// short-circuits to an empty frame.
    pub fn transform(&self, rows: &[&CustomerRecord]) -> Result<FeatureFrame, PreprocessError> {
        if rows.is_empty() {
            return Ok(FeatureFrame::empty(self.schema.selected.clone()));
        }
        let imputed = impute(rows, &self.schema)?;
        let (columns, values) = match &self.scaling {
            Scaling::Batch => {
                let levels = observed_levels(&imputed);
                let (columns, mut values) = one_hot(&imputed, &self.schema, &levels);
                MinMaxScaler::fit(&values).transform(&mut values);
                (columns, values)
            }
            Scaling::Fitted(t) => {
                let (columns, mut values) = one_hot(&imputed, &self.schema, &t.levels);
                t.scaler.transform(&mut values);
                (columns, values)
            }
        };
        FeatureFrame::new(columns, values).select(&self.schema.selected)
    }
}
