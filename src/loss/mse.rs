use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Mean-squared-error loss over a batch.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted − expected)²) over every element.
    pub fn forward(&self, predicted: &Matrix, expected: &Matrix) -> f64 {
        let n = (predicted.rows * predicted.cols) as f64;
        predicted.zip_map(expected, |p, y| (p - y) * (p - y))
            .data.iter().flatten().sum::<f64>() / n
    }

    /// Gradient tensor shaped like `predicted`:
    /// `2 · (predicted − expected) / (output_cols · samples)`.
    /// Must be called with the shape pair of the preceding forward call.
    pub fn backward(&self, predicted: &Matrix, expected: &Matrix) -> Matrix {
        let outputs = predicted.cols as f64;
        let samples = predicted.rows as f64;
        predicted.zip_map(expected, |p, y| 2.0 * (p - y) / outputs / samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_is_the_mean_of_squared_differences() {
        let pred = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let truth = Matrix::from_data(vec![vec![0.0, 2.0], vec![3.0, 2.0]]);
        // squared diffs: 1, 0, 0, 4 → mean 1.25
        assert!((MseLoss.forward(&pred, &truth) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn zero_error_gives_zero_loss_and_zero_gradient() {
        let m = Matrix::from_data(vec![vec![1.5, -2.5]]);
        assert_eq!(MseLoss.forward(&m, &m), 0.0);
        assert!(MseLoss.backward(&m, &m).data[0].iter().all(|&g| g == 0.0));
    }

    #[test]
    fn backward_is_antisymmetric_in_its_arguments() {
        let pred = Matrix::from_data(vec![vec![1.0, 2.0], vec![-3.0, 0.5]]);
        let truth = Matrix::from_data(vec![vec![0.5, 2.5], vec![1.0, 0.0]]);
        let fwd = MseLoss.backward(&pred, &truth);
        let rev = MseLoss.backward(&truth, &pred);
        let sum = fwd + rev;
        assert!(sum.data.iter().flatten().all(|&x| x.abs() < 1e-12));
    }

    #[test]
    fn backward_normalizes_by_outputs_times_samples() {
        let pred = Matrix::from_data(vec![vec![1.0, 1.0], vec![1.0, 1.0]]);
        let truth = Matrix::zeros(2, 2);
        let grad = MseLoss.backward(&pred, &truth);
        // 2 · 1 / (2 outputs · 2 samples)
        assert!(grad.data.iter().flatten().all(|&g| (g - 0.5).abs() < 1e-12));
    }
}
