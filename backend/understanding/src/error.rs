use thiserror::Error;

use textlens_core::FrameError;

/// Errors from the decode + recognize pipeline.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("cannot identify image: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("OCR models unavailable: {0}")]
    Models(String),

    #[error("OCR recognition failed: {0}")]
    Recognition(String),

    #[error("OCR worker stopped: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
