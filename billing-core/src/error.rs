//! Error types for the billing CLI

use thiserror::Error;

/// Core error type for billing operations
#[derive(Error, Debug)]
pub enum BillingError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors surfaced by the billing API
    #[error("API error: {0}")]
    Api(String),

    /// Interactive prompt failures (terminal gone, read error)
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for billing operations
pub type Result<T> = std::result::Result<T, BillingError>;

impl From<serde_json::Error> for BillingError {
    fn from(err: serde_json::Error) -> Self {
        BillingError::Serialization(err.to_string())
    }
}
