use log::info;

use crate::data::{MinMaxScaler, Pca, Windower};
use crate::error::{EngineError, Result};
use crate::model::TrainConfig;
use crate::pipeline::{ArtifactNames, DatasetSchema};
use crate::store::ArtifactStore;
use crate::train::{Trainer, TrainingReport};

/// One training run, strictly sequential:
/// load → select features → scale → reduce → window & split → train →
/// persist {model, scaler, reducer}. Each stage feeds the next; the first
/// failure aborts the run and nothing is persisted.
pub struct TrainingPipeline<'a, S: ArtifactStore> {
    config: TrainConfig,
    schema: DatasetSchema,
    names: ArtifactNames,
    store: &'a mut S,
}

impl<'a, S: ArtifactStore> TrainingPipeline<'a, S> {
    pub fn new(
        config: TrainConfig,
        schema: DatasetSchema,
        names: ArtifactNames,
        store: &'a mut S,
    ) -> TrainingPipeline<'a, S> {
        TrainingPipeline { config, schema, names, store }
    }

    pub fn run(&mut self) -> Result<TrainingReport> {
        self.config.validate()?;

        info!("loading dataset '{}'", self.names.dataset);
        let table = self.store.fetch_dataset(&self.names.dataset)?;

        let features = table.feature_columns(&self.schema.excluded());
        if self.config.n_components > features.len() {
            return Err(EngineError::Config(format!(
                "n_components cannot be greater than the number of features ({})",
                features.len()
            )));
        }
        let raw = table.matrix_of(&features)?;
        info!("{} rows, {} features", raw.rows, raw.cols);

        let mut scaler = MinMaxScaler::new();
        let scaled = scaler
            .fit_transform(&raw)
            .map(|x| if x.is_nan() { 0.0 } else { x });

        let mut reducer = Pca::new(self.config.n_components);
        let reduced = reducer.fit_transform(&scaled)?;
        info!("reduced to {} components", reduced.cols);

        let windower = Windower::new(self.config.time_step, self.config.train_ratio);
        let split = windower.create_train_test_sets(&reduced);
        info!("{} train pairs, {} test pairs", split.x_train.rows, split.x_test.rows);

        let trainer = Trainer::new(&self.config);
        let (model, report) = trainer.fit(
            &split.x_train,
            &split.y_train,
            &split.x_test,
            &split.y_test,
        )?;

        self.store.put_blob(&self.names.model, &model.to_bytes()?)?;
        self.store.put_blob(&self.names.scaler, &scaler.to_bytes()?)?;
        self.store.put_blob(&self.names.reducer, &reducer.to_bytes()?)?;
        info!("persisted model, scaler, and reducer");

        Ok(report)
    }
}
