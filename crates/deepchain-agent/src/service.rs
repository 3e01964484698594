//! Generation service seam
//!
//! The pipeline needs exactly one operation from its backend: turn a prompt
//! into text with a fixed model. Everything else (transport, timeouts,
//! model management) belongs to the implementation.

use async_trait::async_trait;
use deepchain_core::Result;

/// Text-generation backend (allows stubbing in tests)
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate text for `prompt` with the given model
    ///
    /// Transport and backend failures are reported as
    /// `DeepChainError::Service`.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: GenerationService + ?Sized> GenerationService for std::sync::Arc<T> {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        (**self).generate(model, prompt).await
    }
}

#[async_trait]
impl<T: GenerationService + ?Sized> GenerationService for Box<T> {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        (**self).generate(model, prompt).await
    }
}

#[async_trait]
impl<'a, T: GenerationService + ?Sized> GenerationService for &'a T {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        (**self).generate(model, prompt).await
    }
}
