use thiserror::Error;

/// Crate-wide error type.
///
/// The variants follow the failure taxonomy of the engine:
/// - `Config`   — a rejected training/prediction request (bad activation name,
///                non-positive sizes, out-of-range hyperparameters). Raised
///                before any numeric work begins.
/// - `NotFound` — a data-availability failure (no rows for a requested key
///                pair, missing dataset or artifact). Distinct from `Config`
///                so callers can map it to a not-found response.
/// - `Storage`  — I/O from the storage collaborator.
/// - `Format`   — an artifact blob that does not decode back.
/// - `Dataset`  — a tabular file that does not parse.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("artifact format error: {0}")]
    Format(#[from] serde_json::Error),

    #[error("dataset error: {0}")]
    Dataset(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
