//! Configuration management with validation and defaults
//!
//! Every constant the settlement engine relies on lives here so deployments
//! can tune fees and limits without code changes.

use crate::common::types::{AccountId, Amount, AssetType, BPS_DENOMINATOR};
use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WagerConfig {
    pub assets: AssetConfig,
    pub flip: FlipConfig,
    pub delegate: DelegateConfig,
    pub roulette: RouletteConfig,
    pub bet_limits: BetLimitConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// The platform's primary asset: used by `play`, registered in every new
    /// vault, and subject to the roulette payout cap
    pub primary: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            primary: "0x1::native::Coin".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipConfig {
    pub payout_multiplier: u64,
    pub fee_bps: u64,
    /// Exclusive upper bound on a single-asset flip stake
    pub max_bet: Amount,
}

impl Default for FlipConfig {
    fn default() -> Self {
        Self {
            payout_multiplier: 2,
            fee_bps: 250,
            max_bet: 100_000_000_000,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegateConfig {
    pub fee_bps: u64,
    pub fee_receiver: String,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            fee_bps: 125,
            fee_receiver: "fee-receiver".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RouletteConfig {
    /// Numbers on the wheel; outcomes are drawn from `[0, wheel_size)`
    pub wheel_size: u64,
    pub max_choices: usize,
    /// Payout is `amount * payout_numerator / chosen_count`
    pub payout_numerator: u64,
    /// Cap on payout, enforced for the primary asset only
    pub max_payout: Amount,
    /// Fixed protocol account that receives every roulette stake
    pub house_account: String,
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            wheel_size: 37,
            max_choices: 37,
            payout_numerator: 36,
            max_payout: 3_600_000_000_000,
            house_account: "roulette-house".to_string(),
        }
    }
}

/// Per-asset stake caps for the explicit-asset flip paths.
/// Assets without an entry are not capped.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BetLimitConfig {
    pub per_asset: HashMap<String, Amount>,
}

impl BetLimitConfig {
    pub fn limit_for(&self, asset: &AssetType) -> Option<Amount> {
        self.per_asset.get(asset.name()).copied()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            json: false,
        }
    }
}

impl WagerConfig {
    /// Small limits and verbose logging for tests and local simulation
    pub fn testing() -> Self {
        Self {
            assets: AssetConfig {
                primary: "NATIVE".to_string(),
            },
            flip: FlipConfig {
                max_bet: 1_000_000,
                ..Default::default()
            },
            roulette: RouletteConfig {
                max_payout: 36_000_000,
                ..Default::default()
            },
            logging: LoggingConfig {
                level: LogLevel::Debug,
                json: false,
            },
            ..Default::default()
        }
    }

    pub fn primary_asset(&self) -> AssetType {
        AssetType::new(self.assets.primary.clone())
    }

    pub fn fee_receiver(&self) -> AccountId {
        AccountId::new(self.delegate.fee_receiver.clone())
    }

    pub fn house_account(&self) -> AccountId {
        AccountId::new(self.roulette.house_account.clone())
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.assets.primary.trim().is_empty() {
            return Err(ConfigurationError::ValidationFailed(
                "assets.primary must not be empty".to_string(),
            ));
        }

        if self.flip.fee_bps >= BPS_DENOMINATOR {
            return Err(invalid("flip.fee_bps", self.flip.fee_bps, "must be < 10000"));
        }
        if self.delegate.fee_bps >= BPS_DENOMINATOR {
            return Err(invalid("delegate.fee_bps", self.delegate.fee_bps, "must be < 10000"));
        }
        if self.flip.payout_multiplier == 0 {
            return Err(invalid("flip.payout_multiplier", 0, "must be >= 1"));
        }
        if self.flip.max_bet == 0 {
            return Err(invalid("flip.max_bet", 0, "no bet could ever be placed"));
        }

        if self.roulette.wheel_size == 0 {
            return Err(invalid("roulette.wheel_size", 0, "must be > 0"));
        }
        if self.roulette.max_choices == 0 || self.roulette.max_choices as u64 > self.roulette.wheel_size {
            return Err(invalid(
                "roulette.max_choices",
                self.roulette.max_choices,
                "must be within 1..=wheel_size",
            ));
        }

        if self.delegate.fee_receiver.trim().is_empty() {
            return Err(ConfigurationError::ValidationFailed(
                "delegate.fee_receiver must not be empty".to_string(),
            ));
        }
        if self.roulette.house_account.trim().is_empty() {
            return Err(ConfigurationError::ValidationFailed(
                "roulette.house_account must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WagerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.flip.fee_bps, 250);
        assert_eq!(config.delegate.fee_bps, 125);
        assert_eq!(config.flip.payout_multiplier, 2);
        assert_eq!(config.roulette.max_choices, 37);
    }

    #[test]
    fn test_testing_config_is_valid() {
        assert!(WagerConfig::testing().validate().is_ok());
    }

    #[test]
    fn test_invalid_fee_rejected() {
        let mut config = WagerConfig::default();
        config.flip.fee_bps = 10_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_choice_limit_cannot_exceed_wheel() {
        let mut config = WagerConfig::default();
        config.roulette.max_choices = 38;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bet_limits_lookup() {
        let mut config = WagerConfig::default();
        config.bet_limits.per_asset.insert("USDC".to_string(), 500);
        assert_eq!(config.bet_limits.limit_for(&AssetType::new("USDC")), Some(500));
        assert_eq!(config.bet_limits.limit_for(&AssetType::new("USDT")), None);
    }
}
