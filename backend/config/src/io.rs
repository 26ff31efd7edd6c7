//! Config file location and loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the textlens config directory.
/// Priority: `TEXTLENS_CONFIG_DIR` env > `~/.textlens/` > `./.textlens`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TEXTLENS_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".textlens"),
        None => PathBuf::from(".textlens"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read the config file into an untyped value tree.
///
/// Returns `Ok(None)` if the file doesn't exist; an empty file reads as an
/// empty mapping.
pub async fn load_raw(path: &Path) -> Result<Option<Value>> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(Some(Value::Object(Default::default())));
    }

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(Some(value))
}
