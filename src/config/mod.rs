mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./ebook-sync.toml",
        "./config.toml",
        "~/.config/ebook-sync/config.toml",
        "/etc/ebook-sync/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let base = url::Url::parse(config.api.base_url.trim())
        .with_context(|| format!("Invalid api.base_url: {:?}", config.api.base_url))?;
    if !matches!(base.scheme(), "http" | "https") {
        anyhow::bail!(
            "api.base_url must be an http(s) URL, got scheme {:?}",
            base.scheme()
        );
    }

    if let Some(raw) = config.media.storage_base_url.as_deref() {
        let raw = raw.trim();
        if !raw.is_empty() && url::Url::parse(raw).is_err() && !Path::new(raw).is_absolute() {
            anyhow::bail!(
                "media.storage_base_url must be a URL or an absolute path, got {:?}",
                raw
            );
        }
    }

    if config.api.access_token.is_some() && config.api.token().is_none() {
        tracing::warn!("api.access_token is blank and will be ignored");
    }

    config
        .media_origin()
        .context("Invalid media configuration")?;

    Ok(())
}
