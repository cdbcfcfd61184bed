//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREKIT_DATA_DIR` - Directory holding snapshot files (default: `.storekit`)
//! - `STOREKIT_CART_STORE` - Store name of the cart snapshot (default: `cart-storage`)
//! - `STOREKIT_CURRENCY` - ISO 4217 code used to display totals (default: `USD`)

use std::path::PathBuf;

use storekit_core::CurrencyCode;
use storekit_core::cart::CART_STORE_NAME;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid argument {0}: {1}")]
    InvalidArgument(String, String),
}

/// Storekit CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory holding snapshot files
    pub data_dir: PathBuf,
    /// Store name of the cart snapshot
    pub cart_store: String,
    /// Currency used to display totals
    pub currency: CurrencyCode,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".storekit"),
            cart_store: CART_STORE_NAME.to_string(),
            currency: CurrencyCode::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = lookup("STOREKIT_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);

        let cart_store = match lookup("STOREKIT_CART_STORE") {
            Some(name) if name.is_empty() => {
                return Err(ConfigError::MissingEnvVar("STOREKIT_CART_STORE".to_string()));
            }
            Some(name) => validate_store_name(&name)
                .map(|()| name)
                .map_err(|e| ConfigError::InvalidEnvVar("STOREKIT_CART_STORE".to_string(), e))?,
            None => defaults.cart_store,
        };

        let currency = match lookup("STOREKIT_CURRENCY") {
            Some(code) => code
                .parse::<CurrencyCode>()
                .map_err(|e| ConfigError::InvalidEnvVar("STOREKIT_CURRENCY".to_string(), e))?,
            None => defaults.currency,
        };

        Ok(Self {
            data_dir,
            cart_store,
            currency,
        })
    }

    /// Replace the cart store name from the `--store` flag.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidArgument` if `name` is not a single path
    /// segment.
    pub fn set_cart_store(&mut self, name: String) -> Result<(), ConfigError> {
        validate_store_name(&name)
            .map_err(|e| ConfigError::InvalidArgument("--store".to_string(), e))?;
        self.cart_store = name;
        Ok(())
    }
}

/// Store names become file names, so keep them to a single path segment.
pub(crate) fn validate_store_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("store name cannot be empty".to_string());
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(format!(
            "store name must be a single path segment (got {name:?})"
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<CliConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CliConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.cart_store, "cart-storage");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREKIT_DATA_DIR", "/tmp/shop"),
            ("STOREKIT_CART_STORE", "guest-cart"),
            ("STOREKIT_CURRENCY", "eur"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/shop"));
        assert_eq!(config.cart_store, "guest-cart");
        assert_eq!(config.currency, CurrencyCode::EUR);
    }

    #[test]
    fn test_invalid_currency() {
        let err = load(&[("STOREKIT_CURRENCY", "DOGE")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREKIT_CURRENCY"));
    }

    #[test]
    fn test_store_name_must_be_single_segment() {
        assert!(load(&[("STOREKIT_CART_STORE", "../cart")]).is_err());
        assert!(load(&[("STOREKIT_CART_STORE", "")]).is_err());
    }

    #[test]
    fn test_store_flag_is_validated() {
        let mut config = CliConfig::default();
        for bad in ["../x", "nested/cart", "..", ".", ""] {
            let err = config.set_cart_store(bad.to_string()).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidArgument(ref arg, _) if arg == "--store"));
        }
        assert_eq!(config.cart_store, "cart-storage");

        config.set_cart_store("guest-cart".to_string()).unwrap();
        assert_eq!(config.cart_store, "guest-cart");
    }
}
