use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use reqwest::Url;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Backend base URL cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid backend base URL: {0}. Must be an http:// or https:// URL")]
    InvalidBaseUrl(String),

    #[error("Invalid {0}: must be at least 1 second")]
    ZeroTimeout(&'static str),

    #[error(
        "Invalid timeouts: connect_timeout_secs ({0}) must not exceed timeout_secs ({1})"
    )]
    ConnectTimeoutTooLong(u64, u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Download directory cannot be empty")]
    EmptyDownloadDir,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .trinity/config.yaml (project config)
    /// 3. .trinity/local.yaml (local overrides, optional)
    /// 4. Environment variables (TRINITY_* prefix, `__` separates sections)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".trinity/config.yaml"))
            .merge(Yaml::file(".trinity/local.yaml"))
            .merge(Env::prefixed("TRINITY_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still override the file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("TRINITY_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let base_url = config.backend.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        match Url::parse(base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(ConfigError::InvalidBaseUrl(base_url.to_string())),
        }

        if config.backend.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("timeout_secs"));
        }
        if config.backend.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("connect_timeout_secs"));
        }
        if config.backend.connect_timeout_secs > config.backend.timeout_secs {
            return Err(ConfigError::ConnectTimeoutTooLong(
                config.backend.connect_timeout_secs,
                config.backend.timeout_secs,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if config.output.download_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDownloadDir);
        }

        Ok(())
    }
}
