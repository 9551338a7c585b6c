//! Configuration for DFIR Copilot.
//!
//! Two independent stores live here:
//! - `ConfigStore` reads and writes the flat `dfirvault.conf` file
//! - `JsonConfigStore` persists the simpler `llm_config.json` document
//!
//! They are never reconciled with each other.

mod json_store;
mod store;

pub use json_store::JsonConfigStore;
pub use store::{parse_conf, ConfigStore};

use crate::{CopilotError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Section header written at the top of `dfirvault.conf`
pub const CONF_SECTION: &str = "llm_config";

/// Every persisted key, in the order it is written
pub const CONFIG_KEYS: [&str; 10] = [
    "endpoint",
    "model",
    "temperature",
    "max_tokens",
    "timeout",
    "chunk_size",
    "max_context_events",
    "overlap_events",
    "analysis_mode",
    "system_prompt",
];

/// Instruction preset selecting the prompt phrasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Concise overview of key findings
    Summary,
    /// Per-event detail
    Detailed,
    /// Artifacts, timeline and IOCs
    #[default]
    Forensic,
    /// TTPs, IOCs and attribution
    ThreatIntelligence,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 4] = [
        AnalysisMode::Summary,
        AnalysisMode::Detailed,
        AnalysisMode::Forensic,
        AnalysisMode::ThreatIntelligence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Summary => "summary",
            AnalysisMode::Detailed => "detailed",
            AnalysisMode::Forensic => "forensic",
            AnalysisMode::ThreatIntelligence => "threat_intelligence",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = CopilotError;

    fn from_str(s: &str) -> Result<Self> {
        AnalysisMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                CopilotError::Validation(format!(
                    "analysis_mode must be one of summary, detailed, forensic, threat_intelligence (got '{s}')"
                ))
            })
    }
}

/// Endpoint and model settings shared by the handlers and the streaming command.
///
/// Loaded once per invocation and passed by reference; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopilotConfig {
    /// Ollama base URL
    pub endpoint: String,

    /// Default model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Token limit passed as `num_predict`
    pub max_tokens: u32,

    /// Per-request timeout for generate calls, in seconds
    pub timeout_secs: u64,

    /// Events per chunk
    pub chunk_size: usize,

    /// Stored for the configuration panel; the pipeline does not read it
    pub max_context_events: usize,

    /// Stored for the configuration panel; the pipeline does not read it
    pub overlap_events: usize,

    /// Kept as free text so an unknown stored mode degrades to an empty
    /// instruction instead of failing the load
    pub analysis_mode: String,

    pub system_prompt: String,
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "mistral".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout_secs: 120,
            chunk_size: 10,
            max_context_events: 100,
            overlap_events: 2,
            analysis_mode: AnalysisMode::default().as_str().to_string(),
            system_prompt: "You are a cybersecurity and DFIR expert assistant.".to_string(),
        }
    }
}

impl CopilotConfig {
    /// Apply raw `key = value` pairs on top of this config.
    ///
    /// Unknown keys are ignored. A value that does not parse for its key is an error.
    pub fn overlay<I, K, V>(mut self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref().trim();
            match key {
                "endpoint" => self.endpoint = value.to_string(),
                "model" => self.model = value.to_string(),
                "temperature" => self.temperature = parse_value(key, value)?,
                "max_tokens" => self.max_tokens = parse_value(key, value)?,
                "timeout" => self.timeout_secs = parse_value(key, value)?,
                "chunk_size" => self.chunk_size = parse_value(key, value)?,
                "max_context_events" => self.max_context_events = parse_value(key, value)?,
                "overlap_events" => self.overlap_events = parse_value(key, value)?,
                "analysis_mode" => self.analysis_mode = value.to_string(),
                "system_prompt" => self.system_prompt = value.to_string(),
                other => {
                    tracing::debug!(target = "config_store", key = %other, "Ignoring unknown config key");
                }
            }
        }
        Ok(self)
    }

    /// Look up a setting by its persisted key name
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "endpoint" => self.endpoint.clone(),
            "model" => self.model.clone(),
            "temperature" => self.temperature.to_string(),
            "max_tokens" => self.max_tokens.to_string(),
            "timeout" => self.timeout_secs.to_string(),
            "chunk_size" => self.chunk_size.to_string(),
            "max_context_events" => self.max_context_events.to_string(),
            "overlap_events" => self.overlap_events.to_string(),
            "analysis_mode" => self.analysis_mode.clone(),
            "system_prompt" => self.system_prompt.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// All settings as `(key, value)` pairs in `CONFIG_KEYS` order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|k| self.get(k).map(|v| (*k, v)))
            .collect()
    }

    /// Render the full key set under a single section header
    pub fn to_conf_string(&self) -> String {
        let mut out = format!("[{CONF_SECTION}]\n");
        for (key, value) in self.entries() {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(&value);
            out.push('\n');
        }
        out
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| CopilotError::Config(format!("invalid value for {key}: '{value}'")))
}
