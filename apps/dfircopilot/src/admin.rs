use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use dfir_copilot_core::llm::DEFAULT_PROBE_TIMEOUT;
use dfir_copilot_core::{
    ConfigHandler, ConfigStore, JsonConfigStore, OllamaClient, Result, SaveConfigHandler,
};
use serde_json::json;
use tracing::info;

fn config_handler(app_root: &Path) -> Result<ConfigHandler> {
    // list and edit only hit /api/tags, which runs under the probe timeout
    let client = OllamaClient::new(DEFAULT_PROBE_TIMEOUT)?;
    Ok(ConfigHandler::new(ConfigStore::new(app_root), Arc::new(client)))
}

pub async fn config_list(app_root: &Path) -> Result<()> {
    let listing = config_handler(app_root)?.handle_list().await;
    let out = json!({ "llm_config": listing.to_entry()? });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

pub async fn config_edit(
    app_root: &Path,
    args: BTreeMap<String, String>,
    create: bool,
) -> Result<()> {
    let handler = config_handler(app_root)?;
    if create {
        handler.handle_create(&args).await?;
    } else {
        handler.handle_edit(&args).await?;
    }
    info!(target = "dfircopilot", path = %handler.store().local_path().display(), "Configuration saved");
    Ok(())
}

pub fn llm_config_list(app_root: &Path) -> Result<()> {
    let handler = SaveConfigHandler::new(JsonConfigStore::new(app_root));
    println!("{}", serde_json::to_string_pretty(&handler.handle_list()?)?);
    Ok(())
}

pub fn llm_config_save(app_root: &Path, args: BTreeMap<String, String>) -> Result<()> {
    let handler = SaveConfigHandler::new(JsonConfigStore::new(app_root));
    let message = handler.handle_post(&args)?;
    println!("{}", json!({ "message": message }));
    Ok(())
}
