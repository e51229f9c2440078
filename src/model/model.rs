use log::info;
use rand::seq::SliceRandom;
use serde::{Serialize, Deserialize};

use crate::activation::{Activation, ActivationKind};
use crate::error::Result;
use crate::layers::dense::Dense;
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;
use crate::optim::Optimizer;

/// An ordered stack of dense layers with optional per-layer activations,
/// one loss, and one optimizer.
///
/// Activation `i` applies to layer `i`'s output; layers past the end of the
/// activation list run linear. The number of activations never exceeds the
/// number of layers. A model lives for one training run and afterwards only
/// as a persisted artifact; fresh instances are built per run from
/// [`crate::model::TrainConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub layers: Vec<Dense>,
    pub activations: Vec<Activation>,
    loss: MseLoss,
    optimizer: Optimizer,
}

impl Model {
    pub fn new(optimizer: Optimizer) -> Model {
        Model {
            layers: Vec::new(),
            activations: Vec::new(),
            loss: MseLoss,
            optimizer,
        }
    }

    /// Appends a layer sized `input_size × output_size` and, if given, its
    /// activation. The caller is responsible for chaining sizes; the
    /// configuration builder validates the chain once up front.
    pub fn add_layer(&mut self, input_size: usize, output_size: usize, activation: Option<ActivationKind>) {
        self.layers.push(Dense::new(input_size, output_size));
        if let Some(kind) = activation {
            self.activations.push(Activation::new(kind));
        }
    }

    /// Runs each layer then its activation (if present) in sequence.
    pub fn forward(&mut self, input: &Matrix) -> Matrix {
        let mut output = input.clone();
        for i in 0..self.layers.len() {
            output = self.layers[i].forward(&output);
            if i < self.activations.len() {
                output = self.activations[i].forward(&output);
            }
        }
        output
    }

    /// Propagates the loss gradient backward through activations and layers
    /// in reverse order, leaving each layer's gradients populated.
    pub fn backward(&mut self, output: &Matrix, y_true: &Matrix) {
        let mut dvalues = self.loss.backward(output, y_true);
        for i in (0..self.layers.len()).rev() {
            if i < self.activations.len() {
                dvalues = self.activations[i].backward(&dvalues);
            }
            self.layers[i].backward(&dvalues);
            dvalues = self.layers[i].dinputs.clone();
        }
    }

    /// Mini-batch training: per epoch, shuffle the sample order, walk batches
    /// of `batch_size` (the last may be short), and for each run
    /// forward → loss → backward → optimizer update on every layer in
    /// forward order. The epoch signal is the square root of the mean batch
    /// loss (RMSE); the last epoch's value is returned.
    pub fn train(&mut self, x: &Matrix, y: &Matrix, epochs: usize, batch_size: usize) -> f64 {
        let n = x.rows;
        let mut last_rmse = 0.0;

        for epoch in 1..=epochs {
            let mut indices: Vec<usize> = (0..n).collect();
            indices.shuffle(&mut rand::thread_rng());

            let mut epoch_loss = 0.0;
            let mut n_batches = 0usize;

            for batch_start in (0..n).step_by(batch_size) {
                let batch_end = (batch_start + batch_size).min(n);
                let x_batch = x.select_rows(&indices[batch_start..batch_end]);
                let y_batch = y.select_rows(&indices[batch_start..batch_end]);

                let output = self.forward(&x_batch);
                epoch_loss += self.loss.forward(&output, &y_batch);
                self.backward(&output, &y_batch);

                for (i, layer) in self.layers.iter_mut().enumerate() {
                    self.optimizer.step(i, layer);
                }
                n_batches += 1;
            }

            epoch_loss /= n_batches as f64;
            last_rmse = epoch_loss.sqrt();
            info!("epoch {epoch}/{epochs}: loss {epoch_loss:.6}, rmse {last_rmse:.6}");
        }

        last_rmse
    }

    /// Forward pass without any training bookkeeping requirement. Large
    /// inputs should go through [`crate::train::Trainer::batch_predict`] to
    /// bound peak memory.
    pub fn predict(&mut self, input: &Matrix) -> Matrix {
        self.forward(input)
    }

    /// Mean loss of the model's predictions against `y_true`.
    pub fn evaluate(&self, predicted: &Matrix, y_true: &Matrix) -> f64 {
        self.loss.forward(predicted, y_true)
    }

    /// Serializes the model to an opaque artifact blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Restores a model from a blob previously produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Model> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
