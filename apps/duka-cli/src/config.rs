//! # Ledger Configuration
//!
//! Store-level settings for the CLI.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DUKA_STORE_NAME="Mjengo Hardware"                                  │
//! │     DUKA_RESTOCK_DAMAGED=false                                         │
//! │     DUKA_CART_MAX_LINES=60                                             │
//! │     DUKA_CART_MAX_QUANTITY=5000                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, else the platform config dir:                     │
//! │     ~/.config/duka/ledger.toml (Linux)                                 │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Mjengo Hardware"
//! currency_code = "KES"
//! currency_symbol = "KSh"
//!
//! [cart]
//! max_lines = 60
//! max_quantity = 5000
//!
//! [returns]
//! restock_damaged = false
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use duka_core::money::CURRENCY_CODE;
use duka_core::{CartLimits, ReturnPolicy, MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Sections
// =============================================================================

/// Store identity, shown on responses and receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Must be KES; the ledger only keeps shilling cents.
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Shown on receipts; amounts in responses stay in cents.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Duka Hardware".to_string()
}

fn default_currency_code() -> String {
    CURRENCY_CODE.to_string()
}

fn default_currency_symbol() -> String {
    "KSh".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Cart ceilings for this store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSettings {
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    #[serde(default = "default_max_quantity")]
    pub max_quantity: i64,
}

fn default_max_lines() -> usize {
    MAX_CART_LINES
}

fn default_max_quantity() -> i64 {
    MAX_LINE_QUANTITY
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            max_lines: default_max_lines(),
            max_quantity: default_max_quantity(),
        }
    }
}

/// What happens to returned goods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnSettings {
    /// Restock DAMAGED returns instead of writing them off.
    #[serde(default)]
    pub restock_damaged: bool,
}

// =============================================================================
// Ledger Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub returns: ReturnSettings,
}

impl LedgerConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else platform default if it exists)
    /// 3. Environment variables
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading ledger config from file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// `<platform config dir>/ledger.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "duka", "duka").map(|dirs| dirs.config_dir().join("ledger.toml"))
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `DUKA_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("DUKA_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(value) = lookup("DUKA_RESTOCK_DAMAGED") {
            self.returns.restock_damaged = parse_bool(&value)
                .ok_or_else(|| ConfigError::InvalidValue("DUKA_RESTOCK_DAMAGED".to_string()))?;
        }

        if let Some(value) = lookup("DUKA_CART_MAX_LINES") {
            self.cart.max_lines = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DUKA_CART_MAX_LINES".to_string()))?;
        }

        if let Some(value) = lookup("DUKA_CART_MAX_QUANTITY") {
            self.cart.max_quantity = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DUKA_CART_MAX_QUANTITY".to_string()))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue("store.name".to_string()));
        }

        if !self.store.currency_code.eq_ignore_ascii_case(CURRENCY_CODE) {
            return Err(ConfigError::UnsupportedCurrency(
                self.store.currency_code.clone(),
            ));
        }

        if self.cart.max_lines == 0 || self.cart.max_lines > MAX_CART_LINES {
            return Err(ConfigError::OutOfRange {
                key: "cart.max_lines".to_string(),
                min: 1,
                max: MAX_CART_LINES as i64,
            });
        }

        if self.cart.max_quantity <= 0 || self.cart.max_quantity > MAX_LINE_QUANTITY {
            return Err(ConfigError::OutOfRange {
                key: "cart.max_quantity".to_string(),
                min: 1,
                max: MAX_LINE_QUANTITY,
            });
        }

        Ok(())
    }

    pub fn cart_limits(&self) -> CartLimits {
        CartLimits::new(self.cart.max_lines, self.cart.max_quantity)
    }

    pub fn return_policy(&self) -> ReturnPolicy {
        ReturnPolicy {
            restock_damaged: self.returns.restock_damaged,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Config Error
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("{key} must be between {min} and {max}")]
    OutOfRange { key: String, min: i64, max: i64 },

    #[error("Unsupported currency {0}: the ledger keeps KES only")]
    UnsupportedCurrency(String),
}

// =============================================================================
// Unit Tests
// =============================================================================
