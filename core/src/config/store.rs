//! Flat `dfirvault.conf` store

use super::CopilotConfig;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONF_FILE: &str = "dfirvault.conf";
const APP_CONF_FILE: &str = "app.conf";

/// Parse `key = value` lines, skipping `#` comments and `[section]` headers.
///
/// Lines without `=` are ignored. Keys and values are trimmed; only the first
/// `=` splits, so values may contain `=`.
pub fn parse_conf(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('['))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

/// Reads the user-local override (falling back to the packaged default) and
/// writes edits to the user-local file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    app_root: PathBuf,
}

impl ConfigStore {
    pub fn new<P: AsRef<Path>>(app_root: P) -> Self {
        Self {
            app_root: app_root.as_ref().to_path_buf(),
        }
    }

    pub fn local_dir(&self) -> PathBuf {
        self.app_root.join("local")
    }

    pub fn local_path(&self) -> PathBuf {
        self.local_dir().join(CONF_FILE)
    }

    pub fn default_path(&self) -> PathBuf {
        self.app_root.join("default").join(CONF_FILE)
    }

    /// Stored values merged over defaults.
    ///
    /// Only the first existing file is read. Any read or parse failure yields
    /// the defaults untouched.
    pub fn read(&self) -> CopilotConfig {
        let defaults = CopilotConfig::default();
        for path in [self.local_path(), self.default_path()] {
            if !path.exists() {
                continue;
            }
            return match fs::read_to_string(&path) {
                Ok(text) => match defaults.clone().overlay(parse_conf(&text)) {
                    Ok(cfg) => {
                        debug!(target = "config_store", path = %path.display(), "Loaded configuration");
                        cfg
                    }
                    Err(e) => {
                        warn!(target = "config_store", path = %path.display(), error = %e, "Failed to parse configuration; using defaults");
                        defaults
                    }
                },
                Err(e) => {
                    warn!(target = "config_store", path = %path.display(), error = %e, "Failed to read configuration; using defaults");
                    defaults
                }
            };
        }
        info!(target = "config_store", root = %self.app_root.display(), "No configuration file found; using defaults");
        defaults
    }

    /// Overwrite the user-local file with every key of `cfg`
    pub fn write(&self, cfg: &CopilotConfig) -> Result<()> {
        let path = self.local_path();
        ensure_dir(&self.local_dir())?;
        fs::write(&path, cfg.to_conf_string())?;
        set_world_readable(&path)?;
        info!(target = "config_store", path = %path.display(), "Configuration written");
        Ok(())
    }

    /// Flag the app as configured in `local/app.conf`. Failures are logged only.
    pub fn mark_configured(&self) {
        let path = self.local_dir().join(APP_CONF_FILE);
        let res = ensure_dir(&self.local_dir())
            .and_then(|_| fs::write(&path, "[install]\nis_configured = true\n").map_err(Into::into))
            .and_then(|_| set_world_readable(&path));
        if let Err(e) = res {
            warn!(target = "config_store", path = %path.display(), error = %e, "Failed to mark app as configured");
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)?;
    Ok(())
}

#[cfg(unix)]
fn set_world_readable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_world_readable(_path: &Path) -> Result<()> {
    Ok(())
}
