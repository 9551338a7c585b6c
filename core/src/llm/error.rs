use std::time::Duration;
use thiserror::Error;

/// Failure talking to the Ollama server. Never retried.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Request to LLM timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("Cannot connect to Ollama at {0}. Ensure Ollama is running.")]
    Connect(String),

    #[error("LLM API error: {0}")]
    Request(String),
}

pub type LlmResult<T> = Result<T, LlmError>;
