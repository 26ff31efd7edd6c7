use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use textlens_core::{Completion, CompletionProvider};

use crate::error::CompletionError;
use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";
pub const DEFAULT_MODEL: &str = "nvidia/llama-3.1-nemotron-70b-instruct";

/// Everything the client needs, fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct NemotronSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    /// Sent as `Authorization: Bearer ...` when present.
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for NemotronSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.5,
            top_p: 1.0,
            max_tokens: 1024,
            api_key: None,
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

/// NVIDIA-hosted Nemotron chat-completion client.
pub struct NemotronClient {
    client: Client,
    settings: NemotronSettings,
}

impl NemotronClient {
    pub fn new(settings: NemotronSettings) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(CompletionError::Client)?;
        Ok(Self { client, settings })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.settings.base_url = url.into();
        self
    }

    pub fn settings(&self) -> &NemotronSettings {
        &self.settings
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
            max_tokens: self.settings.max_tokens,
        }
    }

    async fn send_once(&self, body: &ChatRequest<'_>) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = self
            .client
            .post(self.endpoint())
            .header(header::CONTENT_TYPE, "application/json")
            .json(body);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key);
        }
        request.send().await
    }

    /// Send `prompt` and return the first choice, or `None` when the
    /// endpoint answered without any.
    ///
    /// The body is parsed whatever the HTTP status: error payloads simply
    /// carry no choices.
    pub async fn chat(&self, prompt: &str) -> Result<Option<Completion>, CompletionError> {
        let start = Instant::now();
        let body = self.request_body(prompt);

        debug!(model = %self.settings.model, "Sending request to Nemotron");

        let mut attempt = 0;
        let response = loop {
            match self.send_once(&body).await {
                Ok(response) => break response,
                Err(e) if self.settings.retry.should_retry(attempt, &e) => {
                    attempt += 1;
                    let delay = self.settings.retry.delay(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Nemotron request failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(CompletionError::Transport(e)),
            }
        };

        let status = response.status();
        let raw = response.text().await.map_err(CompletionError::Transport)?;
        if !status.is_success() {
            warn!(%status, body = %truncate(&raw, 256), "Nemotron returned an error status");
        }

        let parsed: ChatResponse = serde_json::from_str(&raw)?;
        let Some(choice) = parsed.choices.and_then(|c| c.into_iter().next()) else {
            return Ok(None);
        };

        Ok(Some(Completion {
            content: choice.message.content,
            model: self.settings.model.clone(),
            tokens_used: parsed.usage.and_then(|u| u.total_tokens).unwrap_or(0),
            latency_ms: start.elapsed().as_millis() as u64,
        }))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

#[async_trait]
impl CompletionProvider for NemotronClient {
    fn name(&self) -> &str {
        "nemotron"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn complete(&self, prompt: &str) -> anyhow::Result<Option<Completion>> {
        Ok(self.chat(prompt).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured {
        body: Arc<Mutex<Option<Value>>>,
        auth: Arc<Mutex<Option<String>>>,
        calls: Arc<AtomicUsize>,
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Mock endpoint that records the request and answers with `reply`.
    async fn mock_endpoint(reply: Value) -> (String, Captured) {
        let captured = Captured::default();
        let router = Router::new()
            .route(
                "/chat/completions",
                post(
                    move |State(c): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            c.calls.fetch_add(1, Ordering::SeqCst);
                            *c.body.lock().unwrap() = Some(body);
                            *c.auth.lock().unwrap() = headers
                                .get("authorization")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
                            Json(reply)
                        }
                    },
                ),
            )
            .with_state(captured.clone());
        (serve(router).await, captured)
    }

    fn client(base_url: &str, api_key: Option<&str>) -> NemotronClient {
        NemotronClient::new(NemotronSettings {
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
            retry: RetryPolicy {
                max_retries: 1,
                backoff: Duration::from_millis(10),
            },
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn returns_first_choice() {
        let (url, captured) = mock_endpoint(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "hello"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"total_tokens": 12}
        }))
        .await;

        let out = client(&url, Some("nvapi-test")).chat("hi there").await.unwrap().unwrap();
        assert_eq!(out.content.as_deref(), Some("hello"));
        assert_eq!(out.tokens_used, 12);
        assert_eq!(out.model, DEFAULT_MODEL);

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(
            body,
            json!({
                "model": "nvidia/llama-3.1-nemotron-70b-instruct",
                "messages": [{"role": "user", "content": "hi there"}],
                "temperature": 0.5,
                "top_p": 1.0,
                "max_tokens": 1024
            })
        );
        assert_eq!(
            captured.auth.lock().unwrap().as_deref(),
            Some("Bearer nvapi-test")
        );
    }

    #[tokio::test]
    async fn no_key_sends_no_authorization() {
        let (url, captured) =
            mock_endpoint(json!({"choices": [{"message": {"content": "ok"}}]})).await;
        client(&url, None).chat("x").await.unwrap();
        assert_eq!(*captured.auth.lock().unwrap(), None);
    }

    #[tokio::test]
    async fn empty_or_missing_choices_is_none() {
        let (url, _) = mock_endpoint(json!({"choices": []})).await;
        assert!(client(&url, None).chat("x").await.unwrap().is_none());

        let (url, _) = mock_endpoint(json!({"status": 401, "title": "Unauthorized"})).await;
        assert!(client(&url, None).chat("x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn null_content_stays_null() {
        let (url, _) = mock_endpoint(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .await;
        let out = client(&url, None).chat("x").await.unwrap().unwrap();
        assert_eq!(out.content, None);
    }

    #[tokio::test]
    async fn non_json_body_is_parse_error() {
        let router = Router::new().route("/chat/completions", post(|| async { "<html>502</html>" }));
        let url = serve(router).await;
        let err = client(&url, None).chat("x").await.unwrap_err();
        assert!(matches!(err, CompletionError::Parse(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}"), None)
            .chat("x")
            .await
            .unwrap_err();
        match &err {
            CompletionError::Transport(inner) => {
                assert!(inner.is_connect());
                assert_eq!(err.to_string(), inner.to_string());
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn retries_once_after_timeout() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/chat/completions",
            post(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                    Json(json!({"choices": [{"message": {"content": "second try"}}]}))
                }
            }),
        );
        let url = serve(router).await;

        let client = NemotronClient::new(NemotronSettings {
            base_url: url,
            timeout: Duration::from_millis(300),
            retry: RetryPolicy {
                max_retries: 1,
                backoff: Duration::from_millis(10),
            },
            ..Default::default()
        })
        .unwrap();

        let out = client.chat("x").await.unwrap().unwrap();
        assert_eq!(out.content.as_deref(), Some("second try"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn timeout_without_retries_fails() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({}))
            }),
        );
        let url = serve(router).await;
        let client = NemotronClient::new(NemotronSettings {
            base_url: url,
            timeout: Duration::from_millis(200),
            retry: RetryPolicy::none(),
            ..Default::default()
        })
        .unwrap();

        match client.chat("x").await.unwrap_err() {
            CompletionError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn repeated_requests_are_identical() {
        let (url, captured) =
            mock_endpoint(json!({"choices": [{"message": {"content": "same"}}]})).await;
        let client = client(&url, None);
        let first = client.chat("q").await.unwrap().unwrap();
        let second = client.chat("q").await.unwrap().unwrap();
        assert_eq!(first.content, second.content);
        assert_eq!(captured.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let client = client("http://example.test/v1/", None);
        assert_eq!(client.endpoint(), "http://example.test/v1/chat/completions");
    }
}
