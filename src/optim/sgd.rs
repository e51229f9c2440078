use serde::{Serialize, Deserialize};

use crate::layers::dense::Dense;

/// Plain stochastic gradient descent. Carries nothing but the learning rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one SGD update using the gradients the layer's backward pass
    /// left behind.
    pub fn step(&self, layer: &mut Dense) {
        let lr = self.learning_rate;
        layer.weights = layer.weights.clone() - layer.dweights.map(|g| g * lr);
        layer.biases = layer.biases.clone() - layer.dbiases.map(|g| g * lr);
    }
}
