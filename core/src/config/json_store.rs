//! `llm_config.json` store written by the save-config handler

use crate::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const JSON_FILE: &str = "llm_config.json";

/// Flat JSON document overwritten wholesale on each save. No schema.
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new<P: AsRef<Path>>(app_root: P) -> Self {
        Self {
            path: app_root.as_ref().join("local").join(JSON_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, data: &BTreeMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let body = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, body)?;
        info!(target = "llm_config", path = %self.path.display(), keys = data.len(), "Saved JSON configuration");
        Ok(())
    }

    /// Stored document, or an empty map when nothing has been saved yet
    pub fn load(&self) -> Result<BTreeMap<String, Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
