//! Config defaults: the values a fresh install runs with, plus the
//! normalization pass applied after loading.

use std::path::PathBuf;

use crate::schema::{
    CompletionConfig, LoggingConfig, OcrConfig, ServerConfig, TextlensConfig, UploadsConfig,
};

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:5000";

/// Multipart bodies above this size are rejected before the handler runs.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

pub const DEFAULT_MODELS_DIR: &str = "models";
pub const DEFAULT_OCR_LANGUAGE: &str = "english";

/// Vertical distance (px) under which two fragments share a row.
pub const DEFAULT_LINE_THRESHOLD: i32 = 20;

pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "nvidia/llama-3.1-nemotron-70b-instruct";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_TOP_P: f32 = 1.0;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 1;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

pub const DEFAULT_LOG_LEVEL: &str = "info";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            naming: Default::default(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            language: DEFAULT_OCR_LANGUAGE.to_string(),
            reading_order: Default::default(),
            line_threshold: DEFAULT_LINE_THRESHOLD,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COMPLETION_BASE_URL.to_string(),
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: DEFAULT_MAX_TOKENS,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: None,
            json: false,
        }
    }
}

/// Apply all defaults to a freshly loaded config.
///
/// Blank strings in the file count as "unset".
pub fn apply_all_defaults(config: TextlensConfig) -> TextlensConfig {
    let config = apply_server_defaults(config);
    let config = apply_ocr_defaults(config);
    let config = apply_completion_defaults(config);
    apply_logging_defaults(config)
}

fn apply_server_defaults(mut config: TextlensConfig) -> TextlensConfig {
    let server = &mut config.server;
    if server.bind.trim().is_empty() {
        server.bind = DEFAULT_BIND.to_string();
    }
    if server.public_base_url.trim().is_empty() {
        server.public_base_url = DEFAULT_PUBLIC_BASE_URL.to_string();
    }
    let trimmed = server.public_base_url.trim_end_matches('/').len();
    server.public_base_url.truncate(trimmed);
    config
}

fn apply_ocr_defaults(mut config: TextlensConfig) -> TextlensConfig {
    if config.ocr.language.trim().is_empty() {
        config.ocr.language = DEFAULT_OCR_LANGUAGE.to_string();
    }
    config
}

fn apply_completion_defaults(mut config: TextlensConfig) -> TextlensConfig {
    let completion = &mut config.completion;
    if completion.base_url.trim().is_empty() {
        completion.base_url = DEFAULT_COMPLETION_BASE_URL.to_string();
    }
    let trimmed = completion.base_url.trim_end_matches('/').len();
    completion.base_url.truncate(trimmed);

    if completion.model.trim().is_empty() {
        completion.model = DEFAULT_COMPLETION_MODEL.to_string();
    }
    if completion
        .api_key
        .as_deref()
        .is_some_and(|k| k.trim().is_empty())
    {
        completion.api_key = None;
    }
    config
}

fn apply_logging_defaults(mut config: TextlensConfig) -> TextlensConfig {
    if config.logging.level.trim().is_empty() {
        config.logging.level = DEFAULT_LOG_LEVEL.to_string();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_fall_back() {
        let mut config = TextlensConfig::default();
        config.completion.model = "  ".into();
        config.completion.api_key = Some(String::new());
        config.server.public_base_url = "http://example.test:8080/".into();

        let config = apply_all_defaults(config);
        assert_eq!(config.completion.model, DEFAULT_COMPLETION_MODEL);
        assert_eq!(config.completion.api_key, None);
        assert_eq!(config.server.public_base_url, "http://example.test:8080");
    }

    #[test]
    fn fixed_sampling_parameters() {
        let completion = CompletionConfig::default();
        assert_eq!(completion.temperature, 0.5);
        assert_eq!(completion.top_p, 1.0);
        assert_eq!(completion.max_tokens, 1024);
    }
}
