use thiserror::Error;

use crate::{dataset::DatasetError, model::ConfigError, report::ReportError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Report(#[from] ReportError)
}
