//! Error types for the forex report

use thiserror::Error;

/// Main error type for forex report operations
#[derive(Error, Debug)]
pub enum ForexError {
    /// Network or HTTP-layer failure, with the underlying cause flattened
    /// into the message.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response that arrived intact but carries the provider's own error
    /// object instead of rates.
    #[error("Provider error {code}: {message}")]
    Provider { code: u32, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias for forex report operations
pub type Result<T> = std::result::Result<T, ForexError>;
