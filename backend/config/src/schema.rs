//! textlens runtime configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every section is optional in
//! the file; missing sections and fields take the values in `defaults`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use textlens_core::{ReadingOrder, UploadNaming};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextlensConfig {
    /// HTTP listener and public URL
    pub server: ServerConfig,

    /// Where uploaded images land
    pub uploads: UploadsConfig,

    /// OCR engine models and output ordering
    pub ocr: OcrConfig,

    /// Remote chat-completion endpoint
    pub completion: CompletionConfig,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Prefix of every `image_url` handed back to clients. Not checked
    /// against the bind address.
    pub public_base_url: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadsConfig {
    pub dir: PathBuf,
    pub naming: UploadNaming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OcrConfig {
    /// Directory holding the detection/recognition models and charsets.
    pub models_dir: PathBuf,
    /// Recognition language id (e.g. "english", "latin").
    pub language: String,
    pub reading_order: ReadingOrder,
    /// Row grouping tolerance in pixels, used with `reading_order: lines`.
    pub line_threshold: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompletionConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    /// Bearer credential. Usually supplied through `NEMOTRON_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Extra attempts after a transient transport failure.
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Enables the daily-rotated NDJSON file log when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Emit JSON on the console instead of human-readable lines.
    pub json: bool,
}
