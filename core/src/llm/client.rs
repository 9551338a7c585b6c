use super::error::{LlmError, LlmResult};
use super::traits::LlmBackend;
use crate::{CopilotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Liveness checks and model listing use a short fixed timeout
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Sampling options forwarded under `options`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

/// Body of `POST /api/generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: GenerateOptions,
}

impl GenerateRequest {
    /// Non-streaming request
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        options: GenerateOptions,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
            options,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: Option<String>,
}

/// HTTP client for a local Ollama server
#[derive(Clone)]
pub struct OllamaClient {
    http: Client,
    request_timeout: Duration,
    probe_timeout: Duration,
}

impl OllamaClient {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| CopilotError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            request_timeout,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        })
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    async fn get_tags(&self, endpoint: &str) -> reqwest::Result<reqwest::Response> {
        let url = api_url(endpoint, "tags");
        debug!(target = "ollama_client", "GET {}", url);
        self.http.get(&url).timeout(self.probe_timeout).send().await
    }

    fn classify(&self, endpoint: &str, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.request_timeout)
        } else if err.is_connect() {
            LlmError::Connect(endpoint.to_string())
        } else {
            LlmError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl LlmBackend for OllamaClient {
    async fn probe(&self, endpoint: &str) -> bool {
        match self.get_tags(endpoint).await {
            Ok(resp) => resp.status() == reqwest::StatusCode::OK,
            Err(e) => {
                debug!(target = "ollama_client", error = %e, "Probe failed");
                false
            }
        }
    }

    async fn list_models(&self, endpoint: &str) -> Vec<String> {
        let resp = match self.get_tags(endpoint).await {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => resp,
            Ok(resp) => {
                warn!(target = "ollama_client", status = %resp.status(), "Model listing returned non-200");
                return Vec::new();
            }
            Err(e) => {
                warn!(target = "ollama_client", error = %e, "Model listing failed");
                return Vec::new();
            }
        };
        match resp.json::<TagsResponse>().await {
            Ok(tags) => tags
                .models
                .into_iter()
                .map(|m| m.name.unwrap_or_else(|| "unknown".to_string()))
                .collect(),
            Err(e) => {
                warn!(target = "ollama_client", error = %e, "Malformed model listing");
                Vec::new()
            }
        }
    }

    async fn generate(&self, endpoint: &str, request: &GenerateRequest) -> LlmResult<String> {
        let url = api_url(endpoint, "generate");
        debug!(
            target = "ollama_client",
            model = %request.model,
            prompt_chars = request.prompt.len(),
            "POST {}", url
        );

        let resp = self
            .http
            .post(&url)
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(endpoint, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!(target = "ollama_client", %status, body = %body, "Generate error");
            return Err(LlmError::Request(format!("status={} body={}", status, body)));
        }

        let val: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| match self.classify(endpoint, e) {
                LlmError::Request(msg) => {
                    LlmError::Request(format!("Failed to parse generate JSON: {msg}"))
                }
                other => other,
            })?;
        Ok(val
            .response
            .unwrap_or_else(|| "No response generated".to_string()))
    }
}

fn api_url(endpoint: &str, path: &str) -> String {
    format!("{}/api/{}", endpoint.trim_end_matches('/'), path)
}
