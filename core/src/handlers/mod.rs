//! Host-facing admin handlers
//!
//! - `ConfigHandler`: list/edit over `dfirvault.conf`, probing the endpoint before persisting
//! - `SaveConfigHandler`: post/list over `llm_config.json`, no validation

mod config_handler;
mod save_config;

pub use config_handler::{ConfigHandler, ConfigListing, OPTIONAL_ARGS, REQUIRED_ARGS};
pub use save_config::{SaveConfigHandler, SAVE_ARGS};

use crate::{CopilotError, Result};
use std::collections::BTreeMap;

/// Reject any argument the handler did not declare
fn check_supported(args: &BTreeMap<String, String>, supported: &[&str]) -> Result<()> {
    match args.keys().find(|k| !supported.contains(&k.as_str())) {
        Some(k) => Err(CopilotError::Validation(format!("Argument '{k}' is not supported"))),
        None => Ok(()),
    }
}
