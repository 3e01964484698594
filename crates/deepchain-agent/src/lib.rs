//! # deepchain-agent
//!
//! Generation backend access for the DeepChain pipeline.
//!
//! The pipeline only ever asks for `generate(model, prompt) -> text`. This
//! crate defines that seam ([`GenerationService`]) and ships the Ollama
//! implementation used by the CLI.

mod client;
pub mod endpoint;
mod service;
mod types;

pub use client::OllamaClient;
pub use endpoint::resolve_base_url;
pub use service::GenerationService;
pub use types::{ErrorResponse, GenerateRequest, GenerateResponse};
