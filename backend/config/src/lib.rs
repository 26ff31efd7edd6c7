//! `textlens-config`: runtime configuration for the textlens service.
//!
//! Provides:
//! - Typed config schema (server, uploads, OCR, completion, logging)
//! - YAML loading from `~/.textlens/config.yaml` or an explicit path
//! - `${ENV_VAR}` substitution and `TEXTLENS_*` overrides
//! - Default value application and validation
//! - Config redaction for safe logging

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, resolve_env_vars_with, MissingEnvVarError, API_KEY_VAR};
pub use io::{config_dir, config_file_path, load_raw};
pub use redact::redact;
pub use schema::{
    CompletionConfig, LoggingConfig, OcrConfig, ServerConfig, TextlensConfig, UploadsConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load a `.env` file from the working directory into the process
/// environment, if one exists. Variables already set are left alone.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }
}

/// Load, substitute env vars, apply overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime. `path`
/// falls back to [`config_file_path`] under [`config_dir`]. Validation
/// errors fail the load; warnings come back in the report so they can be
/// logged once a subscriber is installed.
pub async fn load_and_prepare(path: Option<&Path>) -> Result<(TextlensConfig, ValidationReport)> {
    let env: HashMap<String, String> = std::env::vars().collect();
    match path {
        Some(p) => load_and_prepare_with(p, &env).await,
        None => load_and_prepare_with(&config_file_path(&config_dir()), &env).await,
    }
}

/// Same as [`load_and_prepare`] with an explicit environment.
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<(TextlensConfig, ValidationReport)> {
    let config = match load_raw(path).await? {
        Some(raw) => {
            let value = resolve_env_vars_with(&raw, env)
                .context("Failed to resolve env vars in config")?;
            serde_json::from_value(value).with_context(|| {
                format!("Config at {} does not match the schema", path.display())
            })?
        }
        None => TextlensConfig::default(),
    };

    let config = apply_env_overrides(config, env)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    if !report.is_valid() {
        let errors = report
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        bail!("Config has {} error(s): {}", report.errors.len(), errors);
    }

    Ok((config, report))
}
