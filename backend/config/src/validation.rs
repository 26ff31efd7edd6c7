//! Config validation with field paths in every message.

use crate::schema::TextlensConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Emit every warning through `tracing`. Call after the logger is up.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &TextlensConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_uploads(config, &mut report);
    validate_ocr(config, &mut report);
    validate_completion(config, &mut report);
    report
}

fn validate_server(config: &TextlensConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.port == 0 {
        report.error("server.port", "Port must be between 1 and 65535");
    }
    if !is_http_url(&server.public_base_url) {
        report.error(
            "server.publicBaseUrl",
            "Must start with http:// or https://",
        );
    }
    if server.max_upload_bytes == 0 {
        report.error("server.maxUploadBytes", "Must be greater than zero");
    }
}

fn validate_uploads(config: &TextlensConfig, report: &mut ValidationReport) {
    if config.uploads.dir.as_os_str().is_empty() {
        report.error("uploads.dir", "Upload directory cannot be empty");
    }
    if config.uploads.naming == textlens_core::UploadNaming::ClientFilename {
        report.warn(
            "uploads.naming",
            "client-filename naming lets same-named uploads overwrite each other",
        );
    }
}

fn validate_ocr(config: &TextlensConfig, report: &mut ValidationReport) {
    if config.ocr.line_threshold <= 0 {
        report.error("ocr.lineThreshold", "Must be a positive number of pixels");
    }
}

fn validate_completion(config: &TextlensConfig, report: &mut ValidationReport) {
    let completion = &config.completion;
    if !is_http_url(&completion.base_url) {
        report.error("completion.baseUrl", "Must start with http:// or https://");
    }
    if !(0.0..=2.0).contains(&completion.temperature) {
        report.error("completion.temperature", "Must be within [0, 2]");
    }
    if !(completion.top_p > 0.0 && completion.top_p <= 1.0) {
        report.error("completion.topP", "Must be within (0, 1]");
    }
    if completion.max_tokens == 0 {
        report.error("completion.maxTokens", "Must be greater than zero");
    }
    if completion.timeout_secs == 0 {
        report.error("completion.timeoutSecs", "Must be greater than zero");
    }
    if completion.max_retries > 3 {
        report.warn(
            "completion.maxRetries",
            "More than 3 retries can hold a request for several timeouts",
        );
    }
    if completion.api_key.is_none() {
        report.warn(
            "completion.apiKey",
            "No API key set (NEMOTRON_API_KEY); completion requests will be unauthenticated",
        );
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
