use thiserror::Error;

/// Failures talking to the completion endpoint.
///
/// Transport errors display exactly as the HTTP client reports them.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid JSON from completion endpoint: {0}")]
    Parse(#[from] serde_json::Error),
}
