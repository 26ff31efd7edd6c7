//! Optical Character Recognition (OCR)
//!
//! Runs the decode → recognize → order → join pipeline for one uploaded
//! image against the process-wide recognizer.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use textlens_core::{ReadingOrder, TextFragment, TextRecognizer};

use crate::error::OcrError;
use crate::frame::decode_frame;
use crate::reading_order::arrange;

/// Shared OCR entry point, cheap to clone into request handlers.
#[derive(Clone)]
pub struct OcrService {
    recognizer: Arc<dyn TextRecognizer>,
    reading_order: ReadingOrder,
    line_threshold: i32,
}

impl OcrService {
    pub fn new(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            recognizer,
            reading_order: ReadingOrder::Detection,
            line_threshold: 20,
        }
    }

    pub fn with_reading_order(mut self, order: ReadingOrder, line_threshold: i32) -> Self {
        self.reading_order = order;
        self.line_threshold = line_threshold;
        self
    }

    pub fn engine_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Extract all text from an encoded image, on the blocking pool.
    pub async fn extract_text(&self, image: Bytes) -> Result<String, OcrError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.extract_text_blocking(&image)).await?
    }

    /// Same as [`extract_text`](Self::extract_text) on the current thread.
    pub fn extract_text_blocking(&self, image: &[u8]) -> Result<String, OcrError> {
        let frame = decode_frame(image, self.recognizer.channel_order())?;
        info!(
            engine = self.recognizer.name(),
            width = frame.width(),
            height = frame.height(),
            "Running OCR detection on image"
        );

        let fragments = self
            .recognizer
            .recognize(&frame)
            .map_err(|e| OcrError::Recognition(format!("{e:#}")))?;
        debug!(fragments = fragments.len(), "Recognized fragments");

        let fragments = arrange(fragments, self.reading_order, self.line_threshold);
        Ok(join_fragments(&fragments))
    }
}

/// Join fragment texts with single spaces, skipping blank fragments.
pub fn join_fragments(fragments: &[TextFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
