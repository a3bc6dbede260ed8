//! Error types for the vector store

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Index is invalid: {index} (store holds {len} records)")]
    OutOfRange { index: usize, len: usize },

    #[error("Invalid metric: {0}")]
    InvalidMetric(String),

    #[error("Invalid k value: {k} (must be between 1 and {len})")]
    InvalidK { k: usize, len: usize },

    #[error("Invalid dimension: {0} (must be positive)")]
    InvalidDimension(usize),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
