//! Static serving of stored uploads.
//!
//! Mount at `/uploads`:
//!   GET /uploads/:filename  returns the stored bytes, typed by extension

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, warn};

use crate::mime_detect::{detect_mime_type, is_inline_safe};
use crate::store::UploadStore;

/// Build the upload-serving router. Carries its own state, so it nests
/// into a router of any state type.
pub fn upload_router<S>(store: Arc<UploadStore>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/:filename", get(serve_upload))
        .with_state(store)
}

async fn serve_upload(
    Path(filename): Path<String>,
    State(store): State<Arc<UploadStore>>,
) -> Response {
    let Some(path) = store.resolve(&filename) else {
        warn!(filename = %filename, "Rejected suspicious upload path");
        return (StatusCode::BAD_REQUEST, "Invalid filename").into_response();
    };
    debug!(path = %path.display(), "Serving upload");

    match fs::read(&path).await {
        Ok(bytes) => {
            let mime = detect_mime_type(&path);
            let kind = if is_inline_safe(mime) { "inline" } else { "attachment" };
            let disposition = HeaderValue::from_str(&format!("{kind}; filename=\"{filename}\""))
                .unwrap_or(HeaderValue::from_static("attachment"));

            (
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static(mime)),
                    (header::CONTENT_DISPOSITION, disposition),
                    (
                        header::CACHE_CONTROL,
                        HeaderValue::from_static("public, max-age=86400"),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "Upload not found").into_response()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read upload");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read upload").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use textlens_core::UploadNaming;
    use tower::ServiceExt;

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn serves_stored_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(UploadStore::new(tmp.path(), UploadNaming::ClientFilename));
        store.save(Some("card.png"), b"\x89PNG fake").await.unwrap();

        let response = get(upload_router(store), "/card.png").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "inline; filename=\"card.png\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"\x89PNG fake");
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(UploadStore::new(tmp.path(), UploadNaming::ServerAssigned));
        let response = get(upload_router(store), "/nope.png").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn encoded_traversal_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(UploadStore::new(tmp.path(), UploadNaming::ServerAssigned));
        let response = get(upload_router(store), "/..%2Fsecret").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
