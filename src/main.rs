// This binary crate is intentionally minimal.
// All engine logic lives in the library (src/lib.rs and its modules).
// It trains the default architecture on a CSV dataset in a local directory:
//   ferrite-forecast <data-dir> <dataset.csv>

use std::env;
use std::process;

use ferrite_forecast::{ArtifactNames, DatasetSchema, DirStore, TrainConfig, TrainingPipeline};

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let (data_dir, dataset) = match (args.next(), args.next()) {
        (Some(dir), Some(file)) => (dir, file),
        _ => {
            eprintln!("usage: ferrite-forecast <data-dir> <dataset.csv>");
            process::exit(2);
        }
    };

    let mut store = DirStore::new(data_dir);
    let names = ArtifactNames { dataset, ..ArtifactNames::default() };

    let mut pipeline = TrainingPipeline::new(
        TrainConfig::default(),
        DatasetSchema::default(),
        names,
        &mut store,
    );

    match pipeline.run() {
        Ok(report) => {
            println!("train rmse: {:.6}", report.train_rmse);
            if let Some(test_rmse) = report.test_rmse {
                println!("test rmse: {test_rmse:.6}");
            }
        }
        Err(err) => {
            eprintln!("training failed: {err}");
            process::exit(1);
        }
    }
}
