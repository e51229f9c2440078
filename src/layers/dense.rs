use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Initial weight scale; biases start at zero.
const WEIGHT_INIT_SCALE: f64 = 0.01;

/// A dense (affine) layer: `output = input · W + b`.
///
/// `W` is `input_size × output_size`, `b` is `1 × output_size`; neither shape
/// changes after construction. The layer caches the input of its most recent
/// forward call (needed for the weight gradient) and, after a backward pass,
/// exposes `dweights`, `dbiases`, and `dinputs`. Gradients are overwritten on
/// every backward call, never accumulated.
///
/// The nonlinearity is not part of the layer; the model pairs layers with
/// [`crate::activation::Activation`] values separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    pub weights: Matrix,
    pub biases: Matrix,
    #[serde(skip)]
    input: Matrix,
    #[serde(skip)]
    pub dweights: Matrix,
    #[serde(skip)]
    pub dbiases: Matrix,
    #[serde(skip)]
    pub dinputs: Matrix,
}

impl Dense {
    pub fn new(input_size: usize, output_size: usize) -> Dense {
        Dense {
            weights: Matrix::scaled_normal(input_size, output_size, WEIGHT_INIT_SCALE),
            biases: Matrix::zeros(1, output_size),
            input: Matrix::default(),
            dweights: Matrix::default(),
            dbiases: Matrix::default(),
            dinputs: Matrix::default(),
        }
    }

    /// `batch × in` → `batch × out`; stores the input for the backward pass.
    pub fn forward(&mut self, input: &Matrix) -> Matrix {
        self.input = input.clone();
        (input.clone() * self.weights.clone()).add_row(&self.biases)
    }

    /// Consumes ∂L/∂output and fills `dweights`, `dbiases`, `dinputs`.
    /// Must follow a matching forward call in the same pass.
    pub fn backward(&mut self, dvalues: &Matrix) {
        self.dweights = self.input.transpose() * dvalues.clone();
        self.dbiases = dvalues.col_sums();
        self.dinputs = dvalues.clone() * self.weights.transpose();
    }
}
