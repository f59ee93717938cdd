use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use tabcap_ocr::TencentCredentials;

const DEFAULT_REGION: &str = "ap-guangzhou";

#[derive(Debug, Deserialize)]
struct ConfigFile {
    secret_id: String,
    secret_key: String,
    #[serde(default = "default_region")]
    region: String,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Resolve recognition-service credentials.
///
/// A TOML file (`secret_id`, `secret_key`, optional `region`) wins when
/// given; otherwise the `TENCENT_SECRET_ID` / `TENCENT_SECRET_KEY` /
/// `TENCENT_REGION` environment variables are used.
pub fn load(path: Option<&Path>) -> anyhow::Result<TencentCredentials> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<ConfigFile>(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => ConfigFile {
            secret_id: std::env::var("TENCENT_SECRET_ID")
                .context("TENCENT_SECRET_ID is not set (or pass --config)")?,
            secret_key: std::env::var("TENCENT_SECRET_KEY")
                .context("TENCENT_SECRET_KEY is not set (or pass --config)")?,
            region: std::env::var("TENCENT_REGION").unwrap_or_else(|_| default_region()),
        },
    };

    Ok(TencentCredentials {
        secret_id: config.secret_id,
        secret_key: config.secret_key,
        region: config.region,
    })
}
