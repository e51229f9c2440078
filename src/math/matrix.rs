use rand::prelude::*;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::ops::{Add, Sub, Mul};

/// Row-major `rows × cols` matrix of `f64`.
///
/// A batch of samples is a matrix with one sample per row; a bias or a
/// per-column statistic is a `1 × cols` matrix. Dimension mismatches in the
/// operators panic: they are caller contract violations, not recoverable
/// runtime conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    /// Both u1 and u2 must be uniform on (0, 1].
    fn sample_standard_normal(rng: &mut ThreadRng) -> f64 {
        // Draw two independent uniform samples in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Samples every entry from N(0, scale²). Weight matrices are initialized
    /// with a small scale (0.01) so early activations stay near the linear
    /// regime.
    pub fn scaled_normal(rows: usize, cols: usize, scale: f64) -> Matrix {
        let mut rng = rand::thread_rng();
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(&mut rng) * scale;
            }
        }
        res
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Elementwise combination of two same-shape matrices.
    pub fn zip_map<F>(&self, rhs: &Matrix, functor: F) -> Matrix
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(rhs.data.iter())
                .map(|(ra, rb)| ra.iter().zip(rb.iter()).map(|(&a, &b)| functor(a, b)).collect())
                .collect(),
        }
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        self.zip_map(rhs, |a, b| a * b)
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map(|row| row.len()).unwrap_or(0),
            data
        }
    }

    /// A `1 × cols` matrix holding the sum of every column.
    pub fn col_sums(&self) -> Matrix {
        let mut sums = vec![0.0; self.cols];
        for row in &self.data {
            for (j, &x) in row.iter().enumerate() {
                sums[j] += x;
            }
        }
        Matrix { rows: 1, cols: self.cols, data: vec![sums] }
    }

    /// A `1 × cols` matrix holding the mean of every column.
    /// Panics on an empty matrix.
    pub fn col_means(&self) -> Matrix {
        if self.rows == 0 {
            panic!("Cannot take column means of an empty matrix")
        }
        self.col_sums().map(|x| x / self.rows as f64)
    }

    /// Adds a `1 × cols` row vector to every row of `self`.
    pub fn add_row(&self, row: &Matrix) -> Matrix {
        if row.rows != 1 || row.cols != self.cols {
            panic!("Matrices are of incorrect sizes")
        }
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|r| r.iter().zip(row.data[0].iter()).map(|(&a, &b)| a + b).collect())
                .collect(),
        }
    }

    /// Gathers the given rows, in order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data: indices.iter().map(|&i| self.data[i].clone()).collect(),
        }
    }

    /// Copies the contiguous row range `[start, end)` into a new matrix.
    /// An empty range yields a `0 × cols` matrix with the column count intact.
    pub fn slice_rows(&self, start: usize, end: usize) -> Matrix {
        Matrix {
            rows: end - start,
            cols: self.cols,
            data: self.data[start..end].to_vec(),
        }
    }

    /// Extracts column `j` as a `rows × 1` column vector.
    pub fn column(&self, j: usize) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: 1,
            data: self.data.iter().map(|row| vec![row[j]]).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] + rhs.data[i][j];
            }
        }

        res
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res =  Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiply_matches_hand_computation() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_data(vec![vec![5.0, 6.0], vec![7.0, 8.0]]);
        let c = a * b;
        assert_eq!(c.data, vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
    }

    #[test]
    fn transpose_swaps_dimensions() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0, 3.0]]);
        let t = a.transpose();
        assert_eq!((t.rows, t.cols), (3, 1));
        assert_eq!(t.data[2][0], 3.0);
    }

    #[test]
    fn col_sums_and_means() {
        let a = Matrix::from_data(vec![vec![1.0, 10.0], vec![3.0, 30.0]]);
        assert_eq!(a.col_sums().data[0], vec![4.0, 40.0]);
        assert_eq!(a.col_means().data[0], vec![2.0, 20.0]);
    }

    #[test]
    fn add_row_broadcasts_over_every_row() {
        let a = Matrix::zeros(3, 2);
        let bias = Matrix::from_data(vec![vec![1.0, -1.0]]);
        let out = a.add_row(&bias);
        for row in &out.data {
            assert_eq!(row, &vec![1.0, -1.0]);
        }
    }

    #[test]
    fn select_and_slice_rows() {
        let a = Matrix::from_data(vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]]);
        let picked = a.select_rows(&[3, 0]);
        assert_eq!(picked.data, vec![vec![3.0], vec![0.0]]);

        let empty = a.slice_rows(2, 2);
        assert_eq!((empty.rows, empty.cols), (0, 1));
    }

    #[test]
    fn scaled_normal_stays_small() {
        let w = Matrix::scaled_normal(50, 50, 0.01);
        let max = w.data.iter().flatten().fold(0.0f64, |m, &x| m.max(x.abs()));
        // 6 sigma at scale 0.01
        assert!(max < 0.06, "initial weights unexpectedly large: {max}");
    }
}
