pub mod error;
pub mod traits;
pub mod types;

pub use error::FrameError;
pub use traits::{Completion, CompletionProvider, TextRecognizer};
pub use types::{BoundingBox, ChannelOrder, Frame, ReadingOrder, TextFragment, UploadNaming};
