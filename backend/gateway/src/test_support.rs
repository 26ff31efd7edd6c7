//! Shared fixtures for the handler tests: a gateway state backed by a temp
//! upload dir, a canned recognizer and a canned completion provider.

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

use textlens_core::{
    BoundingBox, ChannelOrder, Completion, CompletionProvider, Frame, TextFragment,
    TextRecognizer, UploadNaming,
};
use textlens_media::UploadStore;
use textlens_understanding::OcrService;

use crate::state::GatewayState;

pub const BOUNDARY: &str = "textlens-test-boundary";

pub enum StubRecognizer {
    Says(Vec<String>),
    Fails(String),
}

impl StubRecognizer {
    pub fn says(words: &[&str]) -> Self {
        Self::Says(words.iter().map(|w| w.to_string()).collect())
    }

    pub fn fails(message: &str) -> Self {
        Self::Fails(message.to_string())
    }
}

impl TextRecognizer for StubRecognizer {
    fn name(&self) -> &str {
        "stub-ocr"
    }

    fn channel_order(&self) -> ChannelOrder {
        ChannelOrder::Bgr
    }

    fn recognize(&self, _frame: &Frame) -> Result<Vec<TextFragment>> {
        match self {
            Self::Says(words) => Ok(words
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let bbox = BoundingBox {
                        x: i as i32 * 40,
                        y: 0,
                        width: 30,
                        height: 12,
                    };
                    TextFragment::new(w.as_str(), 0.9, bbox)
                })
                .collect()),
            Self::Fails(message) => anyhow::bail!("{message}"),
        }
    }
}

pub enum StubCompletion {
    Reply(String),
    NullContent,
    Empty,
    Fail(String),
    /// Fails with an outer message wrapping an inner cause.
    FailWithCause,
}

#[async_trait]
impl CompletionProvider for StubCompletion {
    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, _prompt: &str) -> Result<Option<Completion>> {
        match self {
            Self::Reply(content) => Ok(Some(Completion {
                content: Some(content.clone()),
                model: "stub-model".into(),
                tokens_used: 7,
                latency_ms: 1,
            })),
            Self::NullContent => Ok(Some(Completion {
                content: None,
                model: "stub-model".into(),
                tokens_used: 0,
                latency_ms: 1,
            })),
            Self::Empty => Ok(None),
            Self::Fail(message) => anyhow::bail!("{message}"),
            Self::FailWithCause => Err(anyhow::anyhow!("connection reset by peer")
                .context("completion endpoint unreachable")),
        }
    }
}

pub fn stub_state(naming: UploadNaming, recognizer: StubRecognizer) -> (GatewayState, TempDir) {
    stub_state_with(
        naming,
        recognizer,
        Arc::new(StubCompletion::Reply("ok".into())),
    )
}

pub fn stub_state_with(
    naming: UploadNaming,
    recognizer: StubRecognizer,
    completion: Arc<dyn CompletionProvider>,
) -> (GatewayState, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let state = GatewayState::new(
        OcrService::new(Arc::new(recognizer)),
        UploadStore::new(tmp.path(), naming),
        completion,
        "http://localhost:5000/",
    );
    (state, tmp)
}

/// A single-part multipart POST. `file_name: None` sends a plain form value.
pub fn multipart_request(
    uri: &str,
    field: &str,
    file_name: Option<&str>,
    content: &[u8],
) -> Request<Body> {
    let disposition = match file_name {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
    if file_name.is_some() {
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// A 4x4 PNG filled with one colour.
pub fn png_bytes(rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb(rgb));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
