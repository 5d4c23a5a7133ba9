//! # Checkout Configuration
//!
//! Configuration for the checkout service: log filter and pricing policy.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_LOG_FILTER=info,storefront=trace                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     explicit path, else $STOREFRONT_CONFIG, else                       │
//! │     ~/.config/storefront/checkout.toml (Linux)                         │
//! │     ~/Library/Application Support/com.storefront.storefront/… (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     standard discount / shipping / loyalty schedule                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # checkout.toml
//! [logging]
//! filter = "info,storefront=debug"
//!
//! [pricing]
//! overflow_rate_per_kg = "7"
//!
//! [[pricing.volume_discounts]]
//! above = "1000"
//! multiplier = "0.80"
//!
//! [[pricing.volume_discounts]]
//! above = "500"
//! multiplier = "0.90"
//!
//! [pricing.loyalty]
//! gold = "0"
//! silver = "0.50"
//! bronze = "1"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storefront_core::error::CoreError;
use storefront_core::pricing::{PricingCalculator, PricingPolicy};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "STOREFRONT_CONFIG";

/// Environment variable overriding the log filter.
pub const LOG_FILTER_ENV: &str = "STOREFRONT_LOG_FILTER";

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "checkout.toml";

// =============================================================================
// Config Error
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is present but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The pricing policy failed validation.
    #[error("Invalid pricing configuration: {0}")]
    Pricing(#[from] CoreError),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Logging Settings
// =============================================================================

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is
    /// not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,storefront=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Checkout Config
// =============================================================================

/// Complete checkout configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Discount, shipping and loyalty tiers.
    #[serde(default)]
    pub pricing: PricingPolicy,
}

impl CheckoutConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (checkout.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading checkout config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load checkout config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing sections keep their defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.filter must not be empty".into()));
        }

        self.pricing.validate()?;

        Ok(())
    }

    /// Builds the pricing calculator for this configuration.
    pub fn calculator(&self) -> ConfigResult<PricingCalculator> {
        Ok(PricingCalculator::new(self.pricing.clone())?)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from a variable lookup (the process environment
    /// outside of tests).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(filter) = lookup(LOG_FILTER_ENV) {
            debug!(filter = %filter, "Overriding log filter from environment");
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use storefront_core::money::Money;

    #[test]
    fn test_default_config() {
        let config = CheckoutConfig::default();
        assert_eq!(config.logging.filter, "info,storefront=debug");
        assert_eq!(config.pricing, PricingPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_override() {
        let config = CheckoutConfig::from_toml(
            r#"
            [logging]
            filter = "warn"

            [pricing]
            overflow_rate_per_kg = "8"

            [pricing.loyalty]
            gold = "0"
            silver = "0.25"
            bronze = "1"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.filter, "warn");
        assert_eq!(config.pricing.overflow_rate_per_kg, Money::from_major(8));
        assert_eq!(config.pricing.loyalty.silver, Decimal::new(25, 2));
        assert_eq!(
            config.pricing.volume_discounts,
            PricingPolicy::default().volume_discounts
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = CheckoutConfig::from_toml("").unwrap();
        assert_eq!(config, CheckoutConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CheckoutConfig::default();
        config.logging.filter = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = CheckoutConfig::default();
        config.pricing.shipping_bands.reverse();
        assert!(matches!(config.validate(), Err(ConfigError::Pricing(_))));
        assert!(config.calculator().is_err());
    }

    #[test]
    fn test_env_override_replaces_log_filter() {
        let mut config = CheckoutConfig::from_toml("[logging]\nfilter = \"warn\"\n").unwrap();

        config.apply_overrides(|key| (key == LOG_FILTER_ENV).then(|| "error".to_string()));
        assert_eq!(config.logging.filter, "error");

        config.apply_overrides(|_| None);
        assert_eq!(config.logging.filter, "error");
        assert_eq!(config.pricing, PricingPolicy::default());
    }

    #[test]
    fn test_blank_env_override_fails_validation() {
        let mut config = CheckoutConfig::default();
        config.apply_overrides(|_| Some(String::new()));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = CheckoutConfig::from_toml("[pricing\noverflow").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("storefront-checkout-does-not-exist.toml");
        let config = CheckoutConfig::load_or_default(Some(path));
        assert_eq!(config.pricing, PricingPolicy::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "storefront-checkout-{}.toml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, "[pricing]\noverflow_rate_per_kg = \"9\"\n").unwrap();

        let config = CheckoutConfig::load(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.pricing.overflow_rate_per_kg, Money::from_major(9));
    }

    #[test]
    fn test_toml_serialization() {
        let config = CheckoutConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("[logging]"));

        let parsed = CheckoutConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
