//! Command options for the streaming analysis command and their resolution
//! against the stored configuration

use crate::config::{AnalysisMode, CopilotConfig};
use crate::llm::GenerateOptions;
use crate::{CopilotError, Result};
use std::ops::RangeInclusive;
use std::time::Duration;

pub const CHUNK_SIZE_RANGE: RangeInclusive<usize> = 1..=1000;
pub const MAX_TOKENS_RANGE: RangeInclusive<u32> = 100..=8000;
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Options supplied on the command line. Unset values fall back to the config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeOptions {
    /// The analyst's question; required
    pub prompt: String,
    pub model: Option<String>,
    pub chunk_size: Option<usize>,
    pub analysis_mode: Option<AnalysisMode>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl AnalyzeOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = Some(n);
        self
    }

    pub fn with_mode(mut self, mode: AnalysisMode) -> Self {
        self.analysis_mode = Some(mode);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(CopilotError::Validation("prompt must not be empty".into()));
        }
        if let Some(n) = self.chunk_size {
            check_range("chunk_size", n, &CHUNK_SIZE_RANGE)?;
        }
        if let Some(n) = self.max_tokens {
            check_range("max_tokens", n, &MAX_TOKENS_RANGE)?;
        }
        if let Some(t) = self.temperature {
            check_range("temperature", t, &TEMPERATURE_RANGE)?;
        }
        Ok(())
    }
}

fn check_range<T>(name: &str, value: T, range: &RangeInclusive<T>) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(CopilotError::Validation(format!(
            "{name} must be between {} and {} (got {value})",
            range.start(),
            range.end()
        )))
    }
}

/// Fully resolved inputs for one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub endpoint: String,
    pub model: String,
    pub chunk_size: usize,
    pub analysis_mode: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub generate: GenerateOptions,
    pub timeout: Duration,
}

impl AnalysisSettings {
    /// Command options win over config; endpoint, timeout and system prompt
    /// always come from config.
    pub fn resolve(cfg: &CopilotConfig, opts: AnalyzeOptions) -> Result<Self> {
        opts.validate()?;
        Ok(Self {
            endpoint: cfg.endpoint.clone(),
            model: opts.model.unwrap_or_else(|| cfg.model.clone()),
            chunk_size: opts.chunk_size.unwrap_or(cfg.chunk_size),
            analysis_mode: opts
                .analysis_mode
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| cfg.analysis_mode.clone()),
            system_prompt: cfg.system_prompt.clone(),
            user_prompt: opts.prompt,
            generate: GenerateOptions {
                temperature: opts.temperature.unwrap_or(cfg.temperature),
                num_predict: opts.max_tokens.unwrap_or(cfg.max_tokens),
            },
            timeout: Duration::from_secs(cfg.timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_override_config() {
        let cfg = CopilotConfig::default();
        let opts = AnalyzeOptions {
            prompt: "triage".into(),
            model: Some("llama3".into()),
            chunk_size: Some(25),
            analysis_mode: Some(AnalysisMode::ThreatIntelligence),
            max_tokens: Some(500),
            temperature: Some(0.1),
        };
        let s = AnalysisSettings::resolve(&cfg, opts).unwrap();
        assert_eq!(s.model, "llama3");
        assert_eq!(s.chunk_size, 25);
        assert_eq!(s.analysis_mode, "threat_intelligence");
        assert_eq!(s.generate.num_predict, 500);
        assert_eq!(s.generate.temperature, 0.1);
        assert_eq!(s.endpoint, "http://localhost:11434");
    }

    #[test]
    fn unset_options_fall_back_to_config() {
        let cfg = CopilotConfig {
            model: "phi3".into(),
            chunk_size: 7,
            ..Default::default()
        };
        let s = AnalysisSettings::resolve(&cfg, AnalyzeOptions::new("triage")).unwrap();
        assert_eq!(s.model, "phi3");
        assert_eq!(s.chunk_size, 7);
        assert_eq!(s.analysis_mode, "forensic");
        assert_eq!(s.generate.num_predict, 2000);
        assert_eq!(s.timeout, Duration::from_secs(120));
    }

    #[test]
    fn out_of_range_options_are_rejected() {
        for opts in [
            AnalyzeOptions::new("q").with_chunk_size(0),
            AnalyzeOptions::new("q").with_chunk_size(1001),
            AnalyzeOptions {
                max_tokens: Some(50),
                ..AnalyzeOptions::new("q")
            },
            AnalyzeOptions {
                temperature: Some(1.5),
                ..AnalyzeOptions::new("q")
            },
            AnalyzeOptions::new("   "),
        ] {
            assert!(matches!(opts.validate(), Err(CopilotError::Validation(_))));
        }
    }
}
