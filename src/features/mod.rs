//! Feature preprocessing: customer rows → impute → one-hot → min-max → fixed column projection.

mod encode;
mod pipeline;
mod scale;

pub use pipeline::{FittedTransform, Preprocessor, Scaling};
pub use scale::MinMaxScaler;

use crate::config::FeaturesConfig;
use ndarray::{Array2, ArrayView1, Axis};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("record has no value for declared column `{0}`")]
    MissingInput(String),
    #[error("column `{0}` holds a value of the wrong kind")]
    WrongFieldType(String),
    #[error("selected column `{0}` absent after encoding")]
    MissingColumn(String),
    #[error("cannot fit a transform on zero rows")]
    EmptyFit,
    #[error("scaling mode `fitted` needs features.scaling.transform_path")]
    MissingTransformPath,
    #[error("fitted transform does not match the configured schema: {0}")]
    IncompatibleTransform(String),
    #[error("transform artifact io: {0}")]
    Io(#[from] std::io::Error),
    #[error("transform artifact format: {0}")]
    Format(#[from] serde_json::Error),
}

/// Declared input columns and the projection handed to the scorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    pub id_column: String,
    pub categorical: Vec<String>,
    pub numeric: Vec<String>,
    pub selected: Vec<String>,
}

impl From<&FeaturesConfig> for FeatureSchema {
    fn from(c: &FeaturesConfig) -> Self {
        Self {
            id_column: c.id_column.clone(),
            categorical: c.categorical_columns.clone(),
            numeric: c.numeric_columns.clone(),
            selected: c.selected_columns.clone(),
        }
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::from(&FeaturesConfig::default())
    }
}

/// Named-column numeric table, one row per input record.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl FeatureFrame {
    /// Panics if `values` does not have one column per name.
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Self {
        assert_eq!(columns.len(), values.ncols(), "column names / width mismatch");
        Self { columns, values }
    }

    pub fn empty(columns: Vec<String>) -> Self {
        let width = columns.len();
        Self {
            columns,
            values: Array2::zeros((0, width)),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.values.row(i)
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.values.column(idx))
    }

    /// Project onto `names`, in that order.
    pub fn select(&self, names: &[String]) -> Result<FeatureFrame, PreprocessError> {
        let indices = names
            .iter()
            .map(|n| {
                self.columns
                    .iter()
                    .position(|c| c == n)
                    .ok_or_else(|| PreprocessError::MissingColumn(n.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FeatureFrame {
            columns: names.to_vec(),
            values: self.values.select(Axis(1), &indices),
        })
    }
}
