use anyhow::Result;
use async_trait::async_trait;

use crate::types::{ChannelOrder, Frame, TextFragment};

/// A text detection + recognition engine.
///
/// Inference is CPU-bound and synchronous; callers run it on a blocking
/// thread. Implementations must tolerate being shared across threads, which
/// usually means serializing access to the underlying session.
pub trait TextRecognizer: Send + Sync {
    /// Engine name (e.g., "paddle-ocr").
    fn name(&self) -> &str;

    /// Channel order the engine expects its input frames in.
    fn channel_order(&self) -> ChannelOrder;

    /// Detect and recognize all text in the frame, in engine order.
    fn recognize(&self, frame: &Frame) -> Result<Vec<TextFragment>>;
}

/// Trait for remote chat-completion backends.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g., "nemotron").
    fn name(&self) -> &str;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Send `prompt` as a single user message.
    ///
    /// Returns `Ok(None)` when the remote answered but produced no choices.
    async fn complete(&self, prompt: &str) -> Result<Option<Completion>>;
}

/// The first choice of a successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// `None` when the remote sent `"content": null`.
    pub content: Option<String>,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}
