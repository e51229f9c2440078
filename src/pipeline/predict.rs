use log::info;

use crate::data::{MinMaxScaler, Pca, Table};
use crate::error::{EngineError, Result};
use crate::math::matrix::Matrix;
use crate::model::Model;
use crate::pipeline::{ArtifactNames, DatasetSchema};
use crate::store::ArtifactStore;

/// Serves scalar predictions from a persisted model/scaler/reducer triple.
///
/// A lookup key is a `(shop, item)` pair. The feature vector is the mean of
/// the matching rows' features; when the pair matches nothing, the lookup
/// falls back to the item alone, then the shop alone, and only then fails.
pub struct Predictor {
    model: Model,
    scaler: MinMaxScaler,
    reducer: Pca,
    table: Table,
    features: Vec<String>,
    schema: DatasetSchema,
}

impl Predictor {
    /// Restores the three artifacts and the dataset from the store. The
    /// feature list is derived from the table exactly as it was at training
    /// time: every column except the target and the date.
    pub fn load<S: ArtifactStore>(
        store: &S,
        names: &ArtifactNames,
        schema: DatasetSchema,
    ) -> Result<Predictor> {
        let model = Model::from_bytes(&store.get_blob(&names.model)?)?;
        let scaler = MinMaxScaler::from_bytes(&store.get_blob(&names.scaler)?)?;
        let reducer = Pca::from_bytes(&store.get_blob(&names.reducer)?)?;
        let table = store.fetch_dataset(&names.dataset)?;
        let features = table.feature_columns(&schema.excluded());
        info!("predictor ready: {} rows, {} features", table.len(), features.len());

        Ok(Predictor { model, scaler, reducer, table, features, schema })
    }

    /// Mean feature vector for the key pair, after the fallback chain.
    pub fn group_mean(&self, shop: f64, item: f64) -> Result<Vec<f64>> {
        let rows = self.matching_rows(shop, item)?;
        rows.column_means(&self.features)
    }

    /// Scales and reduces the group mean, then runs the model over it.
    pub fn predict(&mut self, shop: f64, item: f64) -> Result<f64> {
        let mean = self.group_mean(shop, item)?;
        let scaled = self.scaler.transform(&Matrix::from_data(vec![mean]));
        let reduced = self.reducer.transform(&scaled);
        let output = self.model.predict(&reduced);
        Ok(output.data[0][0])
    }

    fn matching_rows(&self, shop: f64, item: f64) -> Result<Table> {
        let both = self
            .table
            .filter_eq(&self.schema.shop, shop)?
            .filter_eq(&self.schema.item, item)?;
        if !both.is_empty() {
            return Ok(both);
        }

        let by_item = self.table.filter_eq(&self.schema.item, item)?;
        if !by_item.is_empty() {
            return Ok(by_item);
        }

        let by_shop = self.table.filter_eq(&self.schema.shop, shop)?;
        if !by_shop.is_empty() {
            return Ok(by_shop);
        }

        Err(EngineError::NotFound(format!(
            "no data found for: shop={shop}, item={item}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayerConfig, TrainConfig};
    use crate::optim::OptimizerKind;
    use crate::pipeline::TrainingPipeline;
    use crate::store::MemStore;

    /// Columns: date, shop, item, amount, f0. Shops 1 and 2 both sell item
    /// 999999; nothing is sold at shop 999 and item 123 does not exist.
    fn fallback_table() -> Table {
        Table::new(
            vec!["date".into(), "shop".into(), "item".into(), "amount".into(), "f0".into()],
            (0..60)
                .map(|i| {
                    let shop = (i % 2 + 1) as f64;
                    vec![
                        f64::NAN,
                        shop,
                        999999.0,
                        30.0 + (i as f64 / 9.0).sin(),
                        shop * 10.0 + (i as f64 / 5.0).cos(),
                    ]
                })
                .collect(),
        )
        .unwrap()
    }

    fn trained_store() -> (MemStore, ArtifactNames) {
        let mut store = MemStore::new();
        store.insert_dataset("sales.csv", fallback_table());

        let config = TrainConfig {
            batch_size: 8,
            time_step: 10,
            learning_rate: 0.05,
            epochs: 2,
            n_components: 2,
            train_ratio: 0.8,
            optimizer: OptimizerKind::Adam,
            layers: vec![
                LayerConfig { output_size: 8, activation: Some("Sigmoid".into()) },
                LayerConfig { output_size: 1, activation: None },
            ],
        };
        let names = ArtifactNames::default();
        TrainingPipeline::new(config, DatasetSchema::default(), names.clone(), &mut store)
            .run()
            .unwrap();
        (store, names)
    }

    #[test]
    fn predicts_a_finite_scalar_for_an_existing_pair() {
        let (store, names) = trained_store();
        let mut predictor = Predictor::load(&store, &names, DatasetSchema::default()).unwrap();
        let prediction = predictor.predict(1.0, 999999.0).unwrap();
        assert!(prediction.is_finite());
    }

    #[test]
    fn unknown_shop_falls_back_to_the_item_mean() {
        let (store, names) = trained_store();
        let predictor = Predictor::load(&store, &names, DatasetSchema::default()).unwrap();

        // Shop 999 has no rows, so the mean must cover every row of the item
        // across shops 1 and 2.
        let mean = predictor.group_mean(999.0, 999999.0).unwrap();
        let all_item = fallback_table();
        let expected = all_item
            .column_means(&["shop".into(), "item".into(), "f0".into()])
            .unwrap();
        for (a, b) in mean.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }

        let mut predictor = predictor;
        assert!(predictor.predict(999.0, 999999.0).unwrap().is_finite());
    }

    #[test]
    fn unknown_item_falls_back_to_the_shop_mean() {
        let (store, names) = trained_store();
        let mut predictor = Predictor::load(&store, &names, DatasetSchema::default()).unwrap();
        assert!(predictor.predict(1.0, 123.0).unwrap().is_finite());
    }

    #[test]
    fn a_pair_with_no_fallback_rows_is_not_found() {
        let (store, names) = trained_store();
        let mut predictor = Predictor::load(&store, &names, DatasetSchema::default()).unwrap();
        assert!(matches!(
            predictor.predict(999.0, 123.0),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn loading_without_artifacts_is_not_found() {
        let mut store = MemStore::new();
        store.insert_dataset("sales.csv", fallback_table());
        let result = Predictor::load(&store, &ArtifactNames::default(), DatasetSchema::default());
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }
}
