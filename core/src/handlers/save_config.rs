use super::check_supported;
use crate::config::JsonConfigStore;
use crate::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

/// Arguments accepted by the save-config endpoint
pub const SAVE_ARGS: [&str; 7] = [
    "endpoint",
    "model",
    "temperature",
    "max_tokens",
    "timeout",
    "chunk_size",
    "analysis_mode",
];

/// Secondary persistence path: whatever was posted goes to JSON as-is
pub struct SaveConfigHandler {
    store: JsonConfigStore,
}

impl SaveConfigHandler {
    pub fn new(store: JsonConfigStore) -> Self {
        Self { store }
    }

    pub fn handle_post(&self, args: &BTreeMap<String, String>) -> Result<String> {
        check_supported(args, &SAVE_ARGS)?;
        self.store.save(args)?;
        info!(target = "llm_config", path = %self.store.path().display(), "LLM config saved");
        Ok("Configuration saved successfully.".to_string())
    }

    pub fn handle_list(&self) -> Result<BTreeMap<String, Value>> {
        self.store.load()
    }
}
