//! Caller-facing errors. Every failure leaves the gateway as
//! `{"error": "<message>"}` with a matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt::Display;
use thiserror::Error;

pub const NO_FILE_UPLOADED: &str = "No file uploaded";
pub const TEXT_REQUIRED: &str = "Text is required";
pub const NO_COMPLETION: &str = "No response from Nemotron";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Required input missing. Fixed message, 400.
    #[error("{0}")]
    Validation(&'static str),

    /// The completion endpoint answered without choices. 500.
    #[error("No response from Nemotron")]
    NoCompletion,

    /// Body exceeded the configured upload limit. 413.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Any failure while doing the work. Carries the underlying error's
    /// display string, 500.
    #[error("{0}")]
    Operation(String),
}

impl ApiError {
    pub fn operation(err: impl Display) -> Self {
        Self::Operation(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NoCompletion | Self::Operation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
