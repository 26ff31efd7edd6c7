//! Log Redaction
//!
//! Scrubs API keys and bearer tokens from strings prior to logging. Remote
//! error bodies and echoed headers pass through here before they are logged.

use once_cell::sync::Lazy;
use regex::Regex;

static BEARER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Bearer\s+[A-Za-z0-9\-\._~+/]+=*").unwrap());
static API_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:nvapi-[A-Za-z0-9_\-]{16,}|sk-[A-Za-z0-9]{32,})").unwrap());

/// Redacts credentials in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BEARER_RE.replace_all(input, "Bearer [REDACTED_TOKEN]");
    API_KEY_RE
        .replace_all(&redacted, "[REDACTED_KEY]")
        .into_owned()
}
