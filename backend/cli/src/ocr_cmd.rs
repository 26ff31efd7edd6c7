//! `textlens ocr <FILE>`: the upload pipeline without the server.

use anyhow::{Context, Result};
use bytes::Bytes;
use std::path::Path;

use textlens_config::TextlensConfig;

use crate::runtime;

pub async fn run(config: &TextlensConfig, path: &Path) -> Result<()> {
    let image = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let ocr = runtime::ocr_service(config)?;
    let text = ocr.extract_text(Bytes::from(image)).await?;
    println!("{text}");
    Ok(())
}
