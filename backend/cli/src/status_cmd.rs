//! `textlens status`: asks a running server for its health report.

use anyhow::Result;
use std::time::Duration;

pub async fn run(port: u16) -> Result<()> {
    let url = format!("http://localhost:{port}/api/health");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    match client.get(&url).send().await {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("textlens is not running on port {port}");
        }
    }
    Ok(())
}
