use super::check_supported;
use crate::config::{ConfigStore, CopilotConfig};
use crate::llm::LlmBackend;
use crate::{CopilotError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

pub const REQUIRED_ARGS: [&str; 2] = ["endpoint", "model"];
pub const OPTIONAL_ARGS: [&str; 8] = [
    "temperature",
    "max_tokens",
    "timeout",
    "chunk_size",
    "max_context_events",
    "overlap_events",
    "analysis_mode",
    "system_prompt",
];

/// Result of a list request: stored settings plus what the endpoint has installed
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigListing {
    pub config: CopilotConfig,
    pub available_models: Vec<String>,
}

impl ConfigListing {
    /// Flat `llm_config` entry; `available_models` is a JSON-encoded string
    pub fn to_entry(&self) -> Result<Map<String, Value>> {
        let mut entry: Map<String, Value> = self
            .config
            .entries()
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::String(v)))
            .collect();
        entry.insert(
            "available_models".to_string(),
            Value::String(serde_json::to_string(&self.available_models)?),
        );
        Ok(entry)
    }
}

/// REST-style handler over `dfirvault.conf`
pub struct ConfigHandler {
    store: ConfigStore,
    backend: Arc<dyn LlmBackend>,
}

impl ConfigHandler {
    pub fn new(store: ConfigStore, backend: Arc<dyn LlmBackend>) -> Self {
        Self { store, backend }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub async fn handle_list(&self) -> ConfigListing {
        let config = self.store.read();
        let available_models = self.backend.list_models(&config.endpoint).await;
        ConfigListing {
            config,
            available_models,
        }
    }

    /// Replace the stored configuration.
    ///
    /// Keys absent from `args` are written with their defaults, not their
    /// previous values. Nothing is written unless the endpoint answers.
    pub async fn handle_edit(&self, args: &BTreeMap<String, String>) -> Result<()> {
        let supported: Vec<&str> = REQUIRED_ARGS.iter().chain(OPTIONAL_ARGS.iter()).copied().collect();
        check_supported(args, &supported)?;
        if let Some(missing) = REQUIRED_ARGS.iter().find(|k| !args.contains_key(**k)) {
            return Err(CopilotError::Validation(format!(
                "Missing required argument '{missing}'"
            )));
        }

        let endpoint = args.get("endpoint").map(String::as_str).unwrap_or_default();
        if !endpoint.is_empty() && !self.backend.probe(endpoint).await {
            warn!(target = "config_handler", endpoint = %endpoint, "Rejecting edit; endpoint unreachable");
            return Err(CopilotError::Validation(format!(
                "Cannot connect to Ollama at {endpoint}"
            )));
        }

        let cfg = CopilotConfig::default().overlay(args)?;
        self.store.write(&cfg)?;
        self.store.mark_configured();
        info!(target = "config_handler", endpoint = %cfg.endpoint, model = %cfg.model, "Configuration updated");
        Ok(())
    }

    /// Initial creation behaves exactly like an edit
    pub async fn handle_create(&self, args: &BTreeMap<String, String>) -> Result<()> {
        self.handle_edit(args).await
    }
}
