//! # deepchain-core
//!
//! Core types for the DeepChain progressive refinement pipeline.
//!
//! One user query is answered by three refinement cycles of increasing depth
//! (direct, expert, comprehensive) whose responses are then synthesized into
//! a single structured answer.
//!
//! ## Core Paradigm
//!
//! - A cycle IS an intent -> prompt -> response pass at a fixed depth
//! - Cycle depth IS the `CycleNumber` ordering (1 < 2 < 3)
//! - A turn IS one pipeline run; nothing survives it

pub mod config;
pub mod degrade;
mod error;
mod types;

pub use config::{DeepChainConfig, DegradePolicy, GenerationConfig};
pub use error::{DeepChainError, Result};
pub use types::*;
