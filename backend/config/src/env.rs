//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside string values of the config file,
//!   resolved at load time. Only uppercase `[A-Z_][A-Z0-9_]*` names match;
//!   `$${VAR}` escapes to a literal `${VAR}`.
//! - Direct overrides from well-known variables (`TEXTLENS_*`,
//!   `NEMOTRON_API_KEY`), applied after the file is parsed.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::schema::TextlensConfig;

/// Env var carrying the bearer credential for the completion endpoint.
pub const API_KEY_VAR: &str = "NEMOTRON_API_KEY";

/// Optional `$` prefix marks an escaped reference.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config value tree using `env`.
///
/// Only string leaves are rewritten. A reference to an unset or empty
/// variable is an error.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let child = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                out.insert(k.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains("${") {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let out = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(out.into_owned())
}

/// Apply direct env var overrides on top of the parsed file.
pub fn apply_env_overrides(
    mut config: TextlensConfig,
    env: &HashMap<String, String>,
) -> Result<TextlensConfig> {
    let get = |name: &str| env.get(name).filter(|v| !v.trim().is_empty());

    if let Some(bind) = get("TEXTLENS_BIND") {
        config.server.bind = bind.clone();
    }
    if let Some(port) = get("TEXTLENS_PORT") {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("TEXTLENS_PORT is not a valid port: {port}"))?;
    }
    if let Some(url) = get("TEXTLENS_PUBLIC_URL") {
        config.server.public_base_url = url.clone();
    }
    if let Some(dir) = get("TEXTLENS_UPLOAD_DIR") {
        config.uploads.dir = PathBuf::from(dir);
    }
    if let Some(naming) = get("TEXTLENS_UPLOAD_NAMING") {
        config.uploads.naming = serde_json::from_value(Value::String(naming.trim().to_string()))
            .with_context(|| format!("TEXTLENS_UPLOAD_NAMING has unknown value: {naming}"))?;
    }
    if let Some(dir) = get("TEXTLENS_MODELS_DIR") {
        config.ocr.models_dir = PathBuf::from(dir);
    }
    if let Some(lang) = get("TEXTLENS_OCR_LANGUAGE") {
        config.ocr.language = lang.clone();
    }
    if let Some(dir) = get("TEXTLENS_LOG_DIR") {
        config.logging.dir = Some(PathBuf::from(dir));
    }
    if let Some(url) = get("NEMOTRON_BASE_URL") {
        config.completion.base_url = url.clone();
    }
    if let Some(key) = get(API_KEY_VAR) {
        config.completion.api_key = Some(key.clone());
    }

    Ok(config)
}
