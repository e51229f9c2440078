//! A from-scratch supervised-learning engine for tabular time series.
//!
//! The core is a feed-forward network trained with mini-batch gradient
//! descent, plus the numeric pipeline that turns a time-ordered table into
//! training tensors: min-max scaling, PCA, single-step windowing, and a
//! chronological train/test split. Trained models, fitted scalers, and
//! fitted reducers are persisted as opaque blobs through the
//! [`store::ArtifactStore`] boundary.

pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod optim;
pub mod model;
pub mod train;
pub mod data;
pub mod store;
pub mod pipeline;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::{Activation, ActivationKind};
pub use layers::dense::Dense;
pub use loss::mse::MseLoss;
pub use optim::{Adam, Optimizer, OptimizerKind, Sgd};
pub use model::{LayerConfig, Model, TrainConfig};
pub use train::{Trainer, TrainingReport};
pub use data::{MinMaxScaler, Pca, Table, TrainTestSplit, Windower};
pub use store::{ArtifactStore, DirStore, MemStore};
pub use pipeline::{ArtifactNames, DatasetSchema, Predictor, TrainingPipeline};
pub use error::{EngineError, Result};
