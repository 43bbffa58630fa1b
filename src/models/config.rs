//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Tier;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP metadata fetching settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Vault storage and subscription settings
    #[serde(default)]
    pub vault: VaultConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Serialize the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.vault.data_file.trim().is_empty() {
            return Err(AppError::validation("vault.data_file is empty"));
        }
        if self.vault.import_concurrency == 0 {
            return Err(AppError::validation(
                "vault.import_concurrency must be > 0",
            ));
        }
        Ok(())
    }
}

/// HTTP client settings used by the metadata fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Where the vault lives and which tier governs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Subscription tier
    #[serde(default)]
    pub tier: Tier,

    /// Path of the JSON vault file
    #[serde(default = "defaults::data_file")]
    pub data_file: String,

    /// Maximum concurrent saves during a bulk import
    #[serde(default = "defaults::import_concurrency")]
    pub import_concurrency: usize,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            tier: Tier::default(),
            data_file: defaults::data_file(),
            import_concurrency: defaults::import_concurrency(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter (`error`, `warn`, `info`, `debug`, `trace`)
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Fetcher defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; ReelVault/1.0)".into()
    }
    pub fn timeout() -> u64 {
        10
    }

    // Vault defaults
    pub fn data_file() -> String {
        "vault.json".into()
    }
    pub fn import_concurrency() -> usize {
        4
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
