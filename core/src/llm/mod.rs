//! LLM module: Ollama HTTP client and the backend trait the pipeline talks to
//!
//! This module provides:
//! - `LlmBackend` trait (`probe`, `list_models`, `generate`)
//! - `OllamaClient`, the reqwest implementation against `/api/tags` and `/api/generate`
//! - `LlmError` distinguishing timeout, connection and other request failures

mod client;
mod error;
mod traits;

pub use client::{GenerateOptions, GenerateRequest, OllamaClient, DEFAULT_PROBE_TIMEOUT};
pub use error::{LlmError, LlmResult};
pub use traits::LlmBackend;

#[cfg(test)]
pub use traits::MockLlmBackend;
