//! Imputation and reference-category one-hot encoding.

use super::{FeatureSchema, PreprocessError};
use crate::store::{CustomerRecord, FieldValue};
use ndarray::Array2;
use std::collections::BTreeSet;

/// Level a missing categorical value takes after zero-fill.
pub(crate) const FILLED_LEVEL: &str = "0";

/// Declared columns of a batch with infinities and missing values already replaced.
pub(crate) struct Imputed {
    /// `[column][row]`, declared categorical order
    pub categorical: Vec<Vec<String>>,
    /// rows × declared numeric columns
    pub numeric: Array2<f64>,
}

pub(crate) fn impute(
    rows: &[&CustomerRecord],
    schema: &FeatureSchema,
) -> Result<Imputed, PreprocessError> {
    let mut numeric = Array2::zeros((rows.len(), schema.numeric.len()));
    for (r, record) in rows.iter().enumerate() {
        for (c, col) in schema.numeric.iter().enumerate() {
            let v = match record.get(col) {
                Some(FieldValue::Number(v)) => *v,
                Some(FieldValue::Category(_)) => {
                    return Err(PreprocessError::WrongFieldType(col.clone()))
                }
                None => return Err(PreprocessError::MissingInput(col.clone())),
            };
            let v = if v.is_infinite() { f64::NAN } else { v };
            numeric[[r, c]] = if v.is_nan() { 0.0 } else { v };
        }
    }

    let mut categorical = Vec::with_capacity(schema.categorical.len());
    for col in &schema.categorical {
        let mut values = Vec::with_capacity(rows.len());
        for record in rows {
            match record.get(col) {
                Some(FieldValue::Category(v)) => {
                    values.push(v.clone().unwrap_or_else(|| FILLED_LEVEL.to_string()))
                }
                Some(FieldValue::Number(_)) => {
                    return Err(PreprocessError::WrongFieldType(col.clone()))
                }
                None => return Err(PreprocessError::MissingInput(col.clone())),
            }
        }
        categorical.push(values);
    }

    Ok(Imputed {
        categorical,
        numeric,
    })
}

/// Sorted distinct levels of each categorical column.
pub(crate) fn observed_levels(imputed: &Imputed) -> Vec<Vec<String>> {
    imputed
        .categorical
        .iter()
        .map(|values| {
            values
                .iter()
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })
        .collect()
}

/// Numeric columns first, then `<column>_<level>` indicators for every level but the first.
pub(crate) fn one_hot(
    imputed: &Imputed,
    schema: &FeatureSchema,
    levels: &[Vec<String>],
) -> (Vec<String>, Array2<f64>) {
    let n_rows = imputed.numeric.nrows();
    let mut columns = schema.numeric.clone();
    for (col, col_levels) in schema.categorical.iter().zip(levels) {
        for level in col_levels.iter().skip(1) {
            columns.push(format!("{col}_{level}"));
        }
    }

    let mut values = Array2::zeros((n_rows, columns.len()));
    let n_numeric = schema.numeric.len();
    values
        .slice_mut(ndarray::s![.., ..n_numeric])
        .assign(&imputed.numeric);

    let mut offset = n_numeric;
    for (col_values, col_levels) in imputed.categorical.iter().zip(levels) {
        let kept = col_levels.len().saturating_sub(1);
        for (r, value) in col_values.iter().enumerate() {
            if let Some(pos) = col_levels.iter().skip(1).position(|l| l == value) {
                values[[r, offset + pos]] = 1.0;
            }
        }
        offset += kept;
    }

    (columns, values)
}
