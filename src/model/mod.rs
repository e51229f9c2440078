pub mod config;
pub mod model;

pub use config::{LayerConfig, TrainConfig};
pub use model::Model;
