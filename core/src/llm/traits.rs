use super::client::GenerateRequest;
use super::error::LlmResult;
use async_trait::async_trait;

/// The seam between the pipeline/handlers and the LLM server
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// True only when `GET {endpoint}/api/tags` answers 200
    async fn probe(&self, endpoint: &str) -> bool;

    /// Installed model names; empty on any failure
    async fn list_models(&self, endpoint: &str) -> Vec<String>;

    /// One non-streaming completion
    async fn generate(&self, endpoint: &str, request: &GenerateRequest) -> LlmResult<String>;
}
