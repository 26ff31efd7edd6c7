//! `POST /search-nemotron`: forwards a text prompt to the configured
//! completion provider and returns the first choice's content.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use textlens_logging::redact_sensitive_data;

use crate::error::{ApiError, TEXT_REQUIRED};
use crate::state::GatewayState;

pub async fn search_nemotron(
    State(state): State<GatewayState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let text = prompt_text(body)?;
    info!(
        provider = state.completion.name(),
        chars = text.chars().count(),
        "Forwarding prompt"
    );

    match state.completion.complete(&text).await {
        Ok(Some(completion)) => {
            info!(
                model = %completion.model,
                tokens = completion.tokens_used,
                latency_ms = completion.latency_ms,
                "Completion received"
            );
            Ok(Json(json!({ "response": completion.content })))
        }
        Ok(None) => {
            warn!("Completion endpoint returned no choices");
            Err(ApiError::NoCompletion)
        }
        Err(e) => {
            let message = e.to_string();
            warn!(error = %redact_sensitive_data(&message), "Completion request failed");
            Err(ApiError::Operation(message))
        }
    }
}

/// Non-empty string `text` from the body, else 400 "Text is required".
fn prompt_text(body: Result<Json<Value>, JsonRejection>) -> Result<String, ApiError> {
    let Ok(Json(value)) = body else {
        return Err(ApiError::Validation(TEXT_REQUIRED));
    };
    match value.get("text").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ApiError::Validation(TEXT_REQUIRED)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{body_json, stub_state_with, StubCompletion, StubRecognizer};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use textlens_core::UploadNaming;
    use tower::ServiceExt;

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/search-nemotron")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn call(stub: StubCompletion, body: &str) -> (StatusCode, Value) {
        let (state, _tmp) = stub_state_with(
            UploadNaming::ServerAssigned,
            StubRecognizer::says(&[]),
            Arc::new(stub),
        );
        let response = crate::build_router(state, 1024)
            .oneshot(post_json(body))
            .await
            .unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    #[tokio::test]
    async fn relays_first_choice() {
        let (status, body) = call(
            StubCompletion::Reply("Paris is the capital of France.".into()),
            r#"{"text":"What is the capital of France?"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": "Paris is the capital of France."}));
    }

    #[tokio::test]
    async fn null_content_is_relayed_as_null() {
        let (status, body) = call(StubCompletion::NullContent, r#"{"text":"hi"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": null}));
    }

    #[tokio::test]
    async fn missing_or_empty_text_is_400() {
        for payload in [r#"{}"#, r#"{"text":""}"#, r#"{"text":42}"#, r#"{"text":null}"#] {
            let (status, body) = call(StubCompletion::Reply("unused".into()), payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
            assert_eq!(body, json!({"error": "Text is required"}));
        }
    }

    #[tokio::test]
    async fn invalid_json_is_400() {
        let (status, body) = call(StubCompletion::Reply("unused".into()), "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Text is required");
    }

    #[tokio::test]
    async fn no_choices_is_500() {
        let (status, body) = call(StubCompletion::Empty, r#"{"text":"hi"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "No response from Nemotron"}));
    }

    #[tokio::test]
    async fn only_the_outer_error_message_is_returned() {
        let (status, body) = call(StubCompletion::FailWithCause, r#"{"text":"hi"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "completion endpoint unreachable"}));
    }

    #[tokio::test]
    async fn provider_error_message_is_returned() {
        let (status, body) = call(
            StubCompletion::Fail("upstream exploded".into()),
            r#"{"text":"hi"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "upstream exploded");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_500_with_transport_error() {
        use textlens_completion::{NemotronClient, NemotronSettings, RetryPolicy};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Arc::new(
            NemotronClient::new(NemotronSettings {
                base_url: format!("http://{addr}/v1"),
                retry: RetryPolicy::none(),
                ..NemotronSettings::default()
            })
            .unwrap(),
        );
        let expected = client.chat("hello").await.unwrap_err().to_string();
        let (state, _tmp) = stub_state_with(
            UploadNaming::ServerAssigned,
            StubRecognizer::says(&[]),
            client,
        );
        let response = crate::build_router(state, 1024)
            .oneshot(post_json(r#"{"text":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": expected }));
        assert_eq!(expected.matches("error sending request").count(), 1);
    }
}
