use thiserror::Error;

/// Errors raised while building or converting a [`Frame`](crate::Frame).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame has zero width or height ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}x3")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
