use log::info;
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::model::{Model, TrainConfig};

/// Batch width used when predicting over large inputs.
const PREDICT_BATCH: usize = 32;

/// Held-out evaluation computed right after a training run.
/// `test_rmse` is absent when the chronological split left no test rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub train_rmse: f64,
    pub test_rmse: Option<f64>,
}

/// Builds a fresh model from a [`TrainConfig`], trains it, and evaluates it
/// on both partitions.
pub struct Trainer<'a> {
    config: &'a TrainConfig,
}

impl<'a> Trainer<'a> {
    pub fn new(config: &'a TrainConfig) -> Trainer<'a> {
        Trainer { config }
    }

    /// Trains on the train partition and reports RMSE on both partitions.
    /// The model is constructed here, per run, from the configuration; no
    /// model state survives from any earlier run.
    pub fn fit(
        &self,
        x_train: &Matrix,
        y_train: &Matrix,
        x_test: &Matrix,
        y_test: &Matrix,
    ) -> Result<(Model, TrainingReport)> {
        let mut model = self.config.build_model(x_train.cols)?;
        model.train(x_train, y_train, self.config.epochs, self.config.batch_size);

        let train_predictions = Self::batch_predict(&mut model, x_train);
        let train_rmse = model.evaluate(&train_predictions, y_train).sqrt();
        info!("train rmse: {train_rmse:.6}");

        let test_rmse = if x_test.is_empty() {
            None
        } else {
            let test_predictions = Self::batch_predict(&mut model, x_test);
            let rmse = model.evaluate(&test_predictions, y_test).sqrt();
            info!("test rmse: {rmse:.6}");
            Some(rmse)
        };

        Ok((model, TrainingReport { train_rmse, test_rmse }))
    }

    /// Predicts over `x` in fixed-size row batches so peak memory stays
    /// bounded by the batch, not the dataset.
    pub fn batch_predict(model: &mut Model, x: &Matrix) -> Matrix {
        let mut predictions: Vec<Vec<f64>> = Vec::with_capacity(x.rows);
        for start in (0..x.rows).step_by(PREDICT_BATCH) {
            let end = (start + PREDICT_BATCH).min(x.rows);
            let batch = model.predict(&x.slice_rows(start, end));
            predictions.extend(batch.data);
        }
        Matrix::from_data(predictions)
    }
}
