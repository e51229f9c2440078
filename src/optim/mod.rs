pub mod sgd;
pub mod adam;

pub use sgd::Sgd;
pub use adam::Adam;

use serde::{Serialize, Deserialize};

use crate::layers::dense::Dense;

/// The parameter-update rule a model trains with. Selected once at model
/// construction; no runtime extensibility is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Optimizer {
    Sgd(Sgd),
    Adam(Adam),
}

impl Optimizer {
    /// Updates the layer registered under `index` from its cached gradients.
    pub fn step(&mut self, index: usize, layer: &mut Dense) {
        match self {
            Optimizer::Sgd(sgd) => sgd.step(layer),
            Optimizer::Adam(adam) => adam.step(index, layer),
        }
    }
}

/// Configuration-level optimizer selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    Sgd,
    Adam,
}

impl OptimizerKind {
    pub fn build(self, learning_rate: f64) -> Optimizer {
        match self {
            OptimizerKind::Sgd => Optimizer::Sgd(Sgd::new(learning_rate)),
            OptimizerKind::Adam => Optimizer::Adam(Adam::new(learning_rate)),
        }
    }
}
