//! Error type for the AIMD model

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Aggregation was requested before any round was recorded.
    #[error("flow '{flow}' has no recorded samples")]
    NoSamples { flow: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, Error>;
