use serde::{Serialize, Deserialize};

use crate::error::{EngineError, Result};
use crate::math::matrix::Matrix;

const POWER_ITERATIONS: usize = 100;
const POWER_TOLERANCE: f64 = 1e-10;

/// Principal component analysis over a feature matrix.
///
/// `fit` centers the data, builds the sample covariance matrix, and extracts
/// the leading eigenvectors by power iteration with deflation. `transform`
/// projects centered rows onto those components; it is applied identically
/// at training and prediction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pca {
    pub n_components: usize,
    mean: Matrix,
    /// `features × n_components`; one principal axis per column.
    components: Matrix,
}

impl Pca {
    pub fn new(n_components: usize) -> Pca {
        Pca {
            n_components,
            mean: Matrix::default(),
            components: Matrix::default(),
        }
    }

    /// Learns the projection from `data`. Fails if more components are
    /// requested than features exist, or there are too few rows to form a
    /// covariance estimate.
    pub fn fit(&mut self, data: &Matrix) -> Result<()> {
        if self.n_components > data.cols {
            return Err(EngineError::Config(format!(
                "n_components cannot be greater than the number of features ({})",
                data.cols
            )));
        }
        if data.rows < 2 {
            return Err(EngineError::Dataset(
                "at least 2 rows are required to fit a covariance matrix".into(),
            ));
        }

        self.mean = data.col_means();
        let centered = self.center(data);
        let covariance = (centered.transpose() * centered.clone())
            .map(|x| x / (data.rows - 1) as f64);

        // Leading eigenvectors by power iteration; after each one is found
        // the matrix is deflated by its rank-one contribution.
        let d = data.cols;
        let mut deflated = covariance;
        let mut components = Matrix::zeros(d, self.n_components);
        for k in 0..self.n_components {
            let (eigenvalue, eigenvector) = power_iteration(&deflated);
            for j in 0..d {
                components.data[j][k] = eigenvector[j];
            }
            for i in 0..d {
                for j in 0..d {
                    deflated.data[i][j] -= eigenvalue * eigenvector[i] * eigenvector[j];
                }
            }
        }
        self.components = components;
        Ok(())
    }

    /// Projects rows onto the fitted components: `(X - mean) · W`.
    pub fn transform(&self, data: &Matrix) -> Matrix {
        self.center(data) * self.components.clone()
    }

    pub fn fit_transform(&mut self, data: &Matrix) -> Result<Matrix> {
        self.fit(data)?;
        Ok(self.transform(data))
    }

    fn center(&self, data: &Matrix) -> Matrix {
        let negated = self.mean.map(|x| -x);
        data.add_row(&negated)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Pca> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Largest eigenpair of a symmetric matrix via power iteration.
fn power_iteration(matrix: &Matrix) -> (f64, Vec<f64>) {
    let n = matrix.rows;
    let mut v = vec![1.0 / (n as f64).sqrt(); n];
    let mut eigenvalue = 0.0;

    for _ in 0..POWER_ITERATIONS {
        // w = A·v
        let mut w = vec![0.0; n];
        for i in 0..n {
            for j in 0..n {
                w[i] += matrix.data[i][j] * v[j];
            }
        }

        // Rayleigh quotient against the normalized previous vector.
        let new_eigenvalue: f64 = v.iter().zip(w.iter()).map(|(&a, &b)| a * b).sum();

        let norm: f64 = w.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > POWER_TOLERANCE {
            for x in &mut w {
                *x /= norm;
            }
        }

        if (new_eigenvalue - eigenvalue).abs() < POWER_TOLERANCE {
            return (new_eigenvalue, w);
        }
        eigenvalue = new_eigenvalue;
        v = w;
    }

    (eigenvalue, v)
}
