use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::math::matrix::Matrix;

/// Per-column min-max scaling to [0, 1].
///
/// Fitting ignores NaN entries; transforming propagates them unchanged (the
/// training pipeline zeroes post-scale NaN as its own step). A column with
/// no spread, or with no finite entries at all, is passed through shifted
/// only, so scaling never divides by zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinMaxScaler {
    mins: Vec<f64>,
    ranges: Vec<f64>,
}

impl MinMaxScaler {
    pub fn new() -> MinMaxScaler {
        MinMaxScaler::default()
    }

    /// Learns per-column minimum and range from `data`.
    pub fn fit(&mut self, data: &Matrix) {
        self.mins = vec![0.0; data.cols];
        self.ranges = vec![1.0; data.cols];

        for j in 0..data.cols {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for row in &data.data {
                let x = row[j];
                if x.is_nan() {
                    continue;
                }
                min = min.min(x);
                max = max.max(x);
            }
            if min.is_finite() {
                self.mins[j] = min;
                let range = max - min;
                self.ranges[j] = if range > 0.0 { range } else { 1.0 };
            }
        }
    }

    /// Applies the fitted scaling: `(x - min) / range` per column.
    /// Must be called after `fit` with a matching column count.
    pub fn transform(&self, data: &Matrix) -> Matrix {
        if data.cols != self.mins.len() {
            panic!("Matrices are of incorrect sizes")
        }
        Matrix {
            rows: data.rows,
            cols: data.cols,
            data: data.data.iter()
                .map(|row| {
                    row.iter().enumerate()
                        .map(|(j, &x)| (x - self.mins[j]) / self.ranges[j])
                        .collect()
                })
                .collect(),
        }
    }

    pub fn fit_transform(&mut self, data: &Matrix) -> Matrix {
        self.fit(data);
        self.transform(data)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<MinMaxScaler> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
