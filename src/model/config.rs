use serde::{Serialize, Deserialize};

use crate::activation::ActivationKind;
use crate::error::{EngineError, Result};
use crate::model::Model;
use crate::optim::OptimizerKind;

/// Describes one layer in a training request: its width and the name of its
/// activation (`"Sigmoid"`, `"Relu"`, `"Tanh"`), or no activation for a
/// linear layer. Input widths are not part of the descriptor; they are
/// chained automatically when the model is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    pub output_size: usize,
    #[serde(default)]
    pub activation: Option<String>,
}

/// A complete, declarative description of one training run: windowing and
/// split parameters, optimizer hyperparameters, and the layer stack.
///
/// A fresh [`Model`] (with its own loss and optimizer state) is built from
/// this at the start of every run, so no training state leaks between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub batch_size: usize,
    /// Accepted for interface compatibility; windowing is always single-step
    /// lookahead regardless of this value.
    pub time_step: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    pub n_components: usize,
    pub train_ratio: f64,
    pub optimizer: OptimizerKind,
    pub layers: Vec<LayerConfig>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            batch_size: 8192,
            time_step: 10,
            learning_rate: 0.01,
            epochs: 100,
            n_components: 10,
            train_ratio: 0.8,
            optimizer: OptimizerKind::Adam,
            layers: vec![
                LayerConfig { output_size: 64, activation: Some("Sigmoid".into()) },
                LayerConfig { output_size: 64, activation: Some("Sigmoid".into()) },
                LayerConfig { output_size: 1, activation: None },
            ],
        }
    }
}

impl TrainConfig {
    /// Rejects out-of-range hyperparameters and malformed layer descriptors
    /// before any data is touched. `n_components` is only bounded below
    /// here; the upper bound depends on the dataset's feature count and is
    /// enforced by the pipeline once that count is known.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size < 1 {
            return Err(EngineError::Config("batch_size must be at least 1".into()));
        }
        if self.time_step < 1 {
            return Err(EngineError::Config("time_step must be at least 1".into()));
        }
        if self.learning_rate <= 0.0 || self.learning_rate >= 1.0 {
            return Err(EngineError::Config(format!(
                "learning_rate must be in (0, 1), got {}", self.learning_rate
            )));
        }
        if self.epochs < 1 {
            return Err(EngineError::Config("epochs must be at least 1".into()));
        }
        if self.n_components < 1 {
            return Err(EngineError::Config("n_components must be at least 1".into()));
        }
        if self.train_ratio <= 0.0 || self.train_ratio >= 1.0 {
            return Err(EngineError::Config(format!(
                "train_ratio must be in (0, 1), got {}", self.train_ratio
            )));
        }
        if self.layers.is_empty() {
            return Err(EngineError::Config("layer architecture must not be empty".into()));
        }
        for layer in &self.layers {
            if layer.output_size == 0 {
                return Err(EngineError::Config("layer output_size must be greater than 0".into()));
            }
            ActivationKind::resolve(layer.activation.as_deref())?;
        }
        Ok(())
    }

    /// Builds a fresh model for one run: resolves activation names, chains
    /// layer input sizes from `input_size`, and instantiates the optimizer.
    pub fn build_model(&self, input_size: usize) -> Result<Model> {
        let mut model = Model::new(self.optimizer.build(self.learning_rate));
        let mut current_input = input_size;
        for layer in &self.layers {
            let activation = ActivationKind::resolve(layer.activation.as_deref())?;
            model.add_layer(current_input, layer.output_size, activation);
            current_input = layer.output_size;
        }
        Ok(model)
    }
}
