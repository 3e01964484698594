//! # deepchain-orchestrator
//!
//! Progressive refinement pipeline for DeepChain.
//!
//! This crate provides:
//! - Per-cycle prompt templates (direct, expert, comprehensive)
//! - Prompt normalization and validation
//! - Single-cycle orchestration (intent -> prompt -> response)
//! - Synthesis of the three cycle responses into one answer
//! - The pipeline controller that runs a whole turn

mod cycle;
mod pipeline;
pub mod postprocess;
mod progress;
mod synthesis;
mod templates;
pub mod validator;

pub use cycle::CycleOrchestrator;
pub use pipeline::{PipelineController, TurnOutcome};
pub use postprocess::normalize;
pub use progress::{NoopObserver, ProgressEvent, ProgressObserver, TracingObserver};
pub use synthesis::{build_synthesis_request, source_label, SynthesisEngine};
pub use templates::CycleTemplateCatalog;
pub use validator::is_valid;
