// DFIR Copilot Core Library
// Chunked LLM analysis of search results against a local Ollama server

pub mod analysis;
pub mod config;
pub mod handlers;
pub mod llm;

// Export core types
pub use analysis::{
    build_prompt, extract_summary, format_events, locate_summary, AnalysisResult,
    AnalysisSettings, AnalyzeOptions, ChunkId, ChunkOutcome, ChunkPipeline, Record, ResultRecord,
    StreamFailure,
};
pub use config::{AnalysisMode, ConfigStore, CopilotConfig, JsonConfigStore};
pub use handlers::{ConfigHandler, ConfigListing, SaveConfigHandler};
pub use llm::{GenerateOptions, GenerateRequest, LlmBackend, LlmError, OllamaClient};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopilotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, CopilotError>;
