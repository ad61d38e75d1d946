pub mod dataset_structs;
pub mod loader;

use thiserror::Error;

pub use loader::{compile_seasons, load_dataset, parse_dataset, Dataset};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset contains no {0}")]
    Empty(&'static str)
}
