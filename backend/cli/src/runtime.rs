//! Builds the long-lived services from a loaded config.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use textlens_completion::{NemotronClient, NemotronSettings, RetryPolicy};
use textlens_config::{CompletionConfig, TextlensConfig};
use textlens_understanding::{OcrModelConfig, OcrService, PaddleOcrEngine};

pub fn nemotron_settings(config: &CompletionConfig) -> NemotronSettings {
    NemotronSettings {
        base_url: config.base_url.clone(),
        model: config.model.clone(),
        temperature: config.temperature,
        top_p: config.top_p,
        max_tokens: config.max_tokens,
        api_key: config.api_key.clone(),
        timeout: Duration::from_secs(config.timeout_secs),
        connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        retry: RetryPolicy {
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        },
    }
}

pub fn completion_client(config: &TextlensConfig) -> Result<NemotronClient> {
    NemotronClient::new(nemotron_settings(&config.completion))
        .context("Failed to build completion client")
}

/// Load the OCR models. Slow; call once.
pub fn ocr_service(config: &TextlensConfig) -> Result<OcrService> {
    let models = OcrModelConfig::new(&config.ocr.models_dir, &config.ocr.language);
    let engine = PaddleOcrEngine::load(&models).with_context(|| {
        format!(
            "Failed to load OCR models for '{}' from {}",
            config.ocr.language,
            config.ocr.models_dir.display()
        )
    })?;
    info!(language = engine.language(), "OCR engine loaded");

    Ok(OcrService::new(Arc::new(engine))
        .with_reading_order(config.ocr.reading_order, config.ocr.line_threshold))
}
