pub mod csv;
pub mod table;
pub mod scale;
pub mod reduce;
pub mod window;

pub use table::Table;
pub use scale::MinMaxScaler;
pub use reduce::Pca;
pub use window::{create_dataset, TrainTestSplit, Windower};
