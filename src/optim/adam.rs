use serde::{Serialize, Deserialize};

use crate::layers::dense::Dense;
use crate::math::matrix::Matrix;

/// First- and second-moment running estimates for one layer's parameters.
/// Allocated on the first update that touches the layer and kept for the
/// optimizer's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MomentSlot {
    weight_momentums: Matrix,
    weight_cache: Matrix,
    bias_momentums: Matrix,
    bias_cache: Matrix,
}

/// Adam (adaptive moment estimation).
///
/// `iterations` is a single counter shared by every layer this optimizer
/// touches; it advances once per `step` call, not once per batch. Layers
/// updated later within the same batch therefore see a slightly larger
/// bias-correction exponent than those updated first. The counter is part of
/// the update rule's observable behavior; see DESIGN.md before changing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta_1: f64,
    pub beta_2: f64,
    pub epsilon: f64,
    iterations: u64,
    slots: Vec<Option<MomentSlot>>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Adam {
        Adam {
            learning_rate,
            beta_1: 0.9,
            beta_2: 0.999,
            epsilon: 1e-7,
            iterations: 0,
            slots: Vec::new(),
        }
    }

    /// Applies one Adam update to the layer registered under `index`.
    pub fn step(&mut self, index: usize, layer: &mut Dense) {
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }

        self.iterations += 1;
        let t = self.iterations as i32;
        let m_correction = 1.0 - self.beta_1.powi(t);
        let v_correction = 1.0 - self.beta_2.powi(t);

        let (beta_1, beta_2) = (self.beta_1, self.beta_2);
        let (lr, eps) = (self.learning_rate, self.epsilon);
        let slot = self.slots[index].get_or_insert_with(|| MomentSlot {
            weight_momentums: Matrix::zeros(layer.weights.rows, layer.weights.cols),
            weight_cache: Matrix::zeros(layer.weights.rows, layer.weights.cols),
            bias_momentums: Matrix::zeros(layer.biases.rows, layer.biases.cols),
            bias_cache: Matrix::zeros(layer.biases.rows, layer.biases.cols),
        });

        slot.weight_momentums = slot.weight_momentums
            .zip_map(&layer.dweights, |m, g| beta_1 * m + (1.0 - beta_1) * g);
        slot.bias_momentums = slot.bias_momentums
            .zip_map(&layer.dbiases, |m, g| beta_1 * m + (1.0 - beta_1) * g);

        slot.weight_cache = slot.weight_cache
            .zip_map(&layer.dweights, |v, g| beta_2 * v + (1.0 - beta_2) * g * g);
        slot.bias_cache = slot.bias_cache
            .zip_map(&layer.dbiases, |v, g| beta_2 * v + (1.0 - beta_2) * g * g);

        let weight_step = slot.weight_momentums.zip_map(&slot.weight_cache, |m, v| {
            let m_hat = m / m_correction;
            let v_hat = v / v_correction;
            lr * m_hat / (v_hat.sqrt() + eps)
        });
        let bias_step = slot.bias_momentums.zip_map(&slot.bias_cache, |m, v| {
            let m_hat = m / m_correction;
            let v_hat = v / v_correction;
            lr * m_hat / (v_hat.sqrt() + eps)
        });

        layer.weights = layer.weights.clone() - weight_step;
        layer.biases = layer.biases.clone() - bias_step;
    }
}
