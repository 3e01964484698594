//! Wire types for the Ollama generate API

use serde::{Deserialize, Serialize};

/// `POST /api/generate` request body
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Always false: the pipeline consumes whole responses
    pub stream: bool,
}

impl GenerateRequest {
    /// Build a non-streaming request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
        }
    }
}

/// `POST /api/generate` response body (non-streaming)
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    /// Tokens generated
    #[serde(default)]
    pub eval_count: Option<u64>,
}

/// Error body returned by Ollama on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
