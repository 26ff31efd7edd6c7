//! textlens HTTP gateway
//!
//! `POST /upload` (image → OCR text), `POST /search-nemotron` (text →
//! completion), `GET /uploads/:name` (stored images) and `GET /api/health`.

pub mod completion_proxy;
pub mod error;
pub mod health_api;
pub mod server;
pub mod state;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::ApiError;
pub use server::{build_router, start_server, UPLOADS_PREFIX};
pub use state::GatewayState;
