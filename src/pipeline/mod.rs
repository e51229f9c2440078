pub mod train;
pub mod predict;

pub use train::TrainingPipeline;
pub use predict::Predictor;

use serde::{Serialize, Deserialize};

/// Names the special columns of a sales dataset: the regression target, the
/// date column (dropped before scaling), and the two grouping keys used by
/// prediction lookups. Every other column is a feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSchema {
    pub target: String,
    pub date: String,
    pub shop: String,
    pub item: String,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        DatasetSchema {
            target: "amount".into(),
            date: "date".into(),
            shop: "shop".into(),
            item: "item".into(),
        }
    }
}

impl DatasetSchema {
    /// The column names excluded from the feature list.
    pub fn excluded(&self) -> [&str; 2] {
        [self.target.as_str(), self.date.as_str()]
    }
}

/// Storage names for the dataset to train on and the three artifacts a
/// completed run persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactNames {
    pub dataset: String,
    pub model: String,
    pub scaler: String,
    pub reducer: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        ArtifactNames {
            dataset: "sales.csv".into(),
            model: "model.json".into(),
            scaler: "scaler.json".into(),
            reducer: "pca.json".into(),
        }
    }
}
