use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dfir_copilot_core::AnalysisMode;

/// App directory holding `default/` and `local/`.
///
/// Explicit flag/env value first, then `<app>/bin/dfircopilot` → `<app>`,
/// then the working directory.
pub fn resolve_app_root(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(p) = explicit {
        return p;
    }
    std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `KEY=VALUE` command-line argument
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    let k = k.trim();
    if k.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{s}`"));
    }
    Ok((k.to_string(), v.to_string()))
}

pub fn parse_mode(s: &str) -> Result<AnalysisMode, String> {
    s.parse::<AnalysisMode>().map_err(|e| e.to_string())
}

/// Later duplicates win, as with repeated form fields
pub fn into_args(pairs: Vec<(String, String)>) -> BTreeMap<String, String> {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("system_prompt=a=b").unwrap(),
            ("system_prompt".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("model").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn explicit_root_wins() {
        assert_eq!(
            resolve_app_root(Some(PathBuf::from("/opt/splunk/etc/apps/DFIRCopilot"))),
            PathBuf::from("/opt/splunk/etc/apps/DFIRCopilot")
        );
    }

    #[test]
    fn mode_parser_lists_choices_on_error() {
        assert_eq!(parse_mode("forensic").unwrap(), AnalysisMode::Forensic);
        assert!(parse_mode("loud").unwrap_err().contains("threat_intelligence"));
    }
}
