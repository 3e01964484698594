//! Unified error types for DeepChain

use crate::types::Stage;
use thiserror::Error;

/// Unified error type for all DeepChain operations
#[derive(Error, Debug)]
pub enum DeepChainError {
    // Pipeline errors
    #[error("Empty result from the {0} stage")]
    EmptyResult(Stage),

    #[error("Generated prompt is invalid: {0:?}")]
    InvalidPrompt(String),

    // Generation backend errors
    #[error("Generation service error: {0}")]
    Service(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

impl DeepChainError {
    /// Whether this error aborts only the current turn
    ///
    /// Configuration and I/O problems are session-level: the shell cannot
    /// recover from them by asking for another query.
    pub fn is_turn_level(&self) -> bool {
        matches!(
            self,
            Self::EmptyResult(_) | Self::InvalidPrompt(_) | Self::Service(_)
        )
    }
}

/// Result type alias using DeepChainError
pub type Result<T> = std::result::Result<T, DeepChainError>;
