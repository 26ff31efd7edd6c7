//! Upload storage for textlens.
//!
//! Writes uploaded images into the upload directory under a name chosen by
//! the configured [`UploadNaming`](textlens_core::UploadNaming) policy and
//! serves them back over HTTP.

pub mod media_server;
pub mod mime_detect;
pub mod store;

pub use media_server::upload_router;
pub use mime_detect::{detect_mime_type, is_inline_safe};
pub use store::{is_safe_name, StoreError, StoredUpload, UploadStore};
