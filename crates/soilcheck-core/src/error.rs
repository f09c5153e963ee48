//! Error types for Soilcheck

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SoilcheckError {
    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Input errors
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SoilcheckError {
    fn from(err: serde_json::Error) -> Self {
        SoilcheckError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SoilcheckError>;
