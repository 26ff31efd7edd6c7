//! Config redaction: produce safe-to-log config snapshots by masking secrets.

use serde_json::Value;

use crate::schema::TextlensConfig;

/// Keys whose string values are secrets.
static SECRET_KEYS: &[&str] = &["apiKey", "api_key", "token", "secret", "password"];

/// Serialize the config with every secret replaced by a short hint.
pub fn redact(config: &TextlensConfig) -> Value {
    let value = serde_json::to_value(config).unwrap_or(Value::Null);
    redact_value(&value, "")
}

fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn mask(secret: &str) -> Value {
    // Keep the vendor prefix visible (e.g. "nvap***").
    let hint = match secret.char_indices().nth(4) {
        Some((idx, _)) => format!("{}***", &secret[..idx]),
        None => "***".to_string(),
    };
    Value::String(hint)
}

fn redact_value(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_secret_key(key) && !s.is_empty() => mask(s),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_value(v, k)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| redact_value(v, key)).collect()),
        other => other.clone(),
    }
}
