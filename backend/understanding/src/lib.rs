//! Image understanding for textlens: decode uploaded bytes into frames and
//! run OCR over them.

pub mod error;
pub mod frame;
pub mod ocr;
pub mod paddle;
pub mod reading_order;

pub use error::OcrError;
pub use frame::decode_frame;
pub use ocr::{join_fragments, OcrService};
pub use paddle::{available_languages, LanguageModel, OcrModelConfig, PaddleOcrEngine};
pub use reading_order::arrange;
