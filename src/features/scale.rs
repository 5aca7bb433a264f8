//! Per-column min-max scaling to [0, 1].

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
}

impl MinMaxScaler {
    /// Learn column minima / maxima. An empty table yields an empty scaler.
    pub fn fit(values: &Array2<f64>) -> Self {
        let mut data_min = Vec::with_capacity(values.ncols());
        let mut data_max = Vec::with_capacity(values.ncols());
        for column in values.axis_iter(Axis(1)) {
            let (lo, hi) = column
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            data_min.push(lo);
            data_max.push(hi);
        }
        Self { data_min, data_max }
    }

    pub fn width(&self) -> usize {
        self.data_min.len()
    }

    /// `(x - min) / (max - min)` in place; zero-range columns use a range of 1, so they map to
    /// `x - min`. Values outside the fitted range are not clipped.
    pub fn transform(&self, values: &mut Array2<f64>) {
        for (c, mut column) in values.axis_iter_mut(Axis(1)).enumerate() {
            let (Some(&lo), Some(&hi)) = (self.data_min.get(c), self.data_max.get(c)) else {
                continue;
            };
            let range = hi - lo;
            let range = if range == 0.0 || !range.is_finite() { 1.0 } else { range };
            column.mapv_inplace(|v| (v - lo) / range);
        }
    }
}
