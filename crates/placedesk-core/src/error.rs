//! Error types for PlaceDesk

use thiserror::Error;

/// Core error type for table-engine operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid filter query: {0}")]
    InvalidFilter(String),

    #[error("Invalid sort specification: {0}")]
    InvalidSort(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for PlaceDesk core operations
pub type Result<T> = std::result::Result<T, CoreError>;
