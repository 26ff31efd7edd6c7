//! `textlens ask <TEXT>`: one completion request, reply on stdout.

use anyhow::{bail, Result};

use textlens_config::TextlensConfig;
use textlens_core::CompletionProvider;

use crate::runtime;

pub async fn run(config: &TextlensConfig, text: &str) -> Result<()> {
    if text.is_empty() {
        bail!("Text is required");
    }
    let client = runtime::completion_client(config)?;
    match client.complete(text).await? {
        Some(completion) => {
            println!("{}", completion.content.as_deref().unwrap_or_default());
            tracing::debug!(
                tokens = completion.tokens_used,
                latency_ms = completion.latency_ms,
                "Completion done"
            );
            Ok(())
        }
        None => bail!("No response from Nemotron"),
    }
}
