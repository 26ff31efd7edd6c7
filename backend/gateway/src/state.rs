use chrono::{DateTime, Utc};
use std::sync::Arc;

use textlens_core::CompletionProvider;
use textlens_media::UploadStore;
use textlens_understanding::OcrService;

use crate::server::UPLOADS_PREFIX;

/// Application state shared across routes. Built once at startup.
#[derive(Clone)]
pub struct GatewayState {
    pub ocr: OcrService,
    pub uploads: Arc<UploadStore>,
    pub completion: Arc<dyn CompletionProvider>,
    /// Prefix for returned `image_url`s, without a trailing slash.
    pub public_base_url: Arc<str>,
    pub started_at: DateTime<Utc>,
}

impl GatewayState {
    pub fn new(
        ocr: OcrService,
        uploads: UploadStore,
        completion: Arc<dyn CompletionProvider>,
        public_base_url: &str,
    ) -> Self {
        Self {
            ocr,
            uploads: Arc::new(uploads),
            completion,
            public_base_url: Arc::from(public_base_url.trim_end_matches('/')),
            started_at: Utc::now(),
        }
    }

    /// Public URL of a stored upload. Not checked for reachability.
    pub fn image_url(&self, stored_name: &str) -> String {
        format!("{}{}/{}", self.public_base_url, UPLOADS_PREFIX, stored_name)
    }
}
