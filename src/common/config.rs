//! Configuration loading
//!
//! Reads a TOML file (optional), applies `WAGER_*` environment overrides and
//! validates the result.

use crate::config::{LogLevel, WagerConfig};
use crate::errors::{ConfigurationError, WagerResult};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Configuration loader with environment variable support
#[derive(Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> WagerResult<WagerConfig> {
        let mut config = match self.config_path {
            Some(ref path) => Self::load_from_file(path)?,
            None => WagerConfig::default(),
        };

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml_str(content: &str) -> WagerResult<WagerConfig> {
        let config: WagerConfig = toml::from_str(content)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_file(path: &str) -> WagerResult<WagerConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)).into())
    }

    fn apply_env_overrides(config: &mut WagerConfig) -> WagerResult<()> {
        if let Ok(asset) = env::var("WAGER_PRIMARY_ASSET") {
            config.assets.primary = asset;
        }
        if let Some(bps) = parse_env("WAGER_FLIP_FEE_BPS")? {
            config.flip.fee_bps = bps;
        }
        if let Some(max_bet) = parse_env("WAGER_FLIP_MAX_BET")? {
            config.flip.max_bet = max_bet;
        }
        if let Some(bps) = parse_env("WAGER_DELEGATE_FEE_BPS")? {
            config.delegate.fee_bps = bps;
        }
        if let Ok(receiver) = env::var("WAGER_FEE_RECEIVER") {
            config.delegate.fee_receiver = receiver;
        }
        if let Some(max_payout) = parse_env("WAGER_ROULETTE_MAX_PAYOUT")? {
            config.roulette.max_payout = max_payout;
        }
        if let Ok(house) = env::var("WAGER_ROULETTE_HOUSE") {
            config.roulette.house_account = house;
        }
        if let Ok(level) = env::var("WAGER_LOG_LEVEL") {
            config.logging.level = parse_log_level(&level)?;
        }
        if let Some(json) = parse_env("WAGER_LOG_JSON")? {
            config.logging.json = json;
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str) -> WagerResult<Option<T>> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| {
                ConfigurationError::InvalidValue {
                    field: key.to_string(),
                    value,
                    reason: "could not be parsed".to_string(),
                }
                .into()
            }),
        Err(_) => Ok(None),
    }
}

fn parse_log_level(value: &str) -> Result<LogLevel, ConfigurationError> {
    match value.to_ascii_lowercase().as_str() {
        "error" => Ok(LogLevel::Error),
        "warn" => Ok(LogLevel::Warn),
        "info" => Ok(LogLevel::Info),
        "debug" => Ok(LogLevel::Debug),
        "trace" => Ok(LogLevel::Trace),
        _ => Err(ConfigurationError::InvalidValue {
            field: "WAGER_LOG_LEVEL".to_string(),
            value: value.to_string(),
            reason: "expected error|warn|info|debug|trace".to_string(),
        }),
    }
}
