//! Error types for the table pipeline and data loading.

use thiserror::Error;

/// Rejected controller or configuration request. State is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("page size must be a positive integer, got {0}")]
    InvalidPageSize(usize),
}

/// Failure while reading a dataset or a configuration file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("input is empty or not a recognised table")]
    EmptyInput,
    #[error("JSON input must be an array of objects")]
    NotAnArray,
    #[error(transparent)]
    Table(#[from] TableError),
}
