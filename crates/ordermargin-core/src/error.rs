// crates/ordermargin-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Config parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Required column '{0}' is missing from the dataset")]
    MissingColumn(String),

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("Data processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
