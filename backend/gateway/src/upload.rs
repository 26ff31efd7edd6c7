//! Image upload + OCR
//!
//! `POST /upload` with a multipart `image` file field. The raw bytes are
//! stored first, then decoded and run through OCR.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, NO_FILE_UPLOADED};
use crate::state::GatewayState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub text: String,
    pub image_url: String,
}

/// Handler for `POST /upload`.
pub async fn upload_image(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::Validation(NO_FILE_UPLOADED));
    };
    let Some((file_name, image)) = read_image_field(&mut multipart).await? else {
        return Err(ApiError::Validation(NO_FILE_UPLOADED));
    };

    let stored = state
        .uploads
        .save(file_name.as_deref(), &image)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to store upload");
            ApiError::operation(e)
        })?;
    info!(
        path = %stored.path.display(),
        original = stored.original_name.as_deref().unwrap_or(""),
        size = stored.size_bytes,
        "Stored upload"
    );

    let text = state.ocr.extract_text(image).await.map_err(|e| {
        warn!(error = %e, stored = %stored.stored_name, "OCR failed");
        ApiError::operation(e)
    })?;

    Ok(Json(UploadResponse {
        text,
        image_url: state.image_url(&stored.stored_name),
    }))
}

/// First file part named `image`, as (client filename, bytes).
///
/// Parts without a filename are form values, not files, and are skipped.
async fn read_image_field(
    multipart: &mut Multipart,
) -> Result<Option<(Option<String>, Bytes)>, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Err(ApiError::PayloadTooLarge(e.body_text()));
            }
            Err(e) => {
                warn!(error = %e, "Malformed multipart body");
                return Ok(None);
            }
        };
        if field.name() != Some(IMAGE_FIELD) || field.file_name().is_none() {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge(e.body_text())
            } else {
                ApiError::operation(e.body_text())
            }
        })?;
        return Ok(Some((file_name, bytes)));
    }
}
