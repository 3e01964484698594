//! Ollama API client
//!
//! Key design: every call is a single stateless request/response. There is
//! no conversation history and no retry loop; a failed request is reported
//! once and the pipeline decides what to do with it.

use crate::endpoint;
use crate::service::GenerationService;
use crate::types::{ErrorResponse, GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use deepchain_core::{DeepChainError, GenerationConfig, Result};
use std::time::Duration;
use tracing::instrument;

const GENERATE_PATH: &str = "/api/generate";

/// Generation client for an Ollama server
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    /// Create a client for the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DeepChainError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from configuration, honouring an explicit URL override
    pub fn from_config(config: &GenerationConfig, explicit_url: Option<&str>) -> Result<Self> {
        let base_url = endpoint::resolve_base_url(explicit_url, &config.base_url)?;
        Self::new(base_url, config.timeout_secs.map(Duration::from_secs))
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generate_url(&self) -> String {
        format!("{}{}", self.base_url, GENERATE_PATH)
    }
}

#[async_trait]
impl GenerationService for OllamaClient {
    #[instrument(skip(self, prompt), fields(url = %self.base_url, prompt_chars = prompt.len()))]
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        tracing::debug!("Sending generate request with model {}", model);

        let request = GenerateRequest::new(model, prompt);

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| DeepChainError::Service(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown".to_string());
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);

            tracing::error!("Ollama returned {}: {}", status, detail);
            return Err(DeepChainError::Service(format!(
                "Ollama API error {}: {}",
                status, detail
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DeepChainError::Service(format!("Failed to parse response: {}", e)))?;

        let output = generated.response.trim().to_string();

        match (generated.prompt_eval_count, generated.eval_count) {
            (Some(input), Some(output_tokens)) => tracing::info!(
                "Generation complete ({} chars, {} input tokens, {} output tokens)",
                output.len(),
                input,
                output_tokens
            ),
            _ => tracing::info!("Generation complete ({} chars)", output.len()),
        }

        Ok(output)
    }
}
