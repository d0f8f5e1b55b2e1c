use anyhow::{bail, Context};
use serde::Deserialize;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    success: bool,
    data: Option<StatusData>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusData {
    status: String,
    version: String,
    timestamp: String,
}

/// `{base}/api/status`, tolerating a trailing slash on `base`.
fn status_url(base: &str) -> anyhow::Result<url::Url> {
    let base = url::Url::parse(base).with_context(|| format!("invalid server URL: {}", base))?;
    base.join("/api/status").context("failed to build status URL")
}

pub async fn handle(url: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let base = url.unwrap_or_else(|| format!("http://{}", AppConfig::from_env().server.bind_address()));
    let endpoint = status_url(&base)?;

    let response = reqwest::get(endpoint.clone())
        .await
        .with_context(|| format!("failed to reach {}", endpoint))?;
    let http_status = response.status();
    let envelope: StatusEnvelope = response.json().await.context("status endpoint returned invalid JSON")?;

    match envelope.data {
        Some(data) if envelope.success => output_success(
            output_format,
            &format!("Server at {} is {}", base, data.status),
            Some(json!({
                "status": data.status,
                "version": data.version,
                "timestamp": data.timestamp,
            })),
        ),
        _ => bail!(
            "server at {} answered {}: {}",
            base,
            http_status,
            envelope.message.unwrap_or_else(|| "no status data".to_string())
        ),
    }
}
