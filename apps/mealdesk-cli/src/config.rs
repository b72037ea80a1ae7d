//! # CLI Configuration
//!
//! Store settings and the catalog location, loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --catalog menu.toml                                                │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     MEALDESK_CATALOG=/etc/mealdesk/menu.toml                           │
//! │     MEALDESK_CURRENCY_SYMBOL=NT$                                       │
//! │     MEALDESK_STORE_NAME=早安美芝城                                      │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/mealdesk/mealdesk.toml (Linux)                           │
//! │     ~/Library/Application Support/com.mealdesk.mealdesk/mealdesk.toml  │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     built-in catalog, "$"                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # mealdesk.toml
//! store_name = "早安美芝城 中山店"
//! currency_symbol = "NT$"
//! catalog = "/etc/mealdesk/menu.toml"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use mealdesk_core::Money;

use crate::error::{CliError, CliResult};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Printed above price summaries.
    pub store_name: String,

    /// Currency symbol for terminal output.
    pub currency_symbol: String,

    /// Catalog TOML file; the built-in catalog when unset.
    pub catalog: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            store_name: "mealdesk".to_string(),
            currency_symbol: "$".to_string(),
            catalog: None,
        }
    }
}

impl CliConfig {
    /// Loads configuration from file, then applies environment overrides.
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|err| CliError::InvalidConfig {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Applies `MEALDESK_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("MEALDESK_CATALOG") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog = Some(PathBuf::from(path));
        }

        if let Some(symbol) = lookup("MEALDESK_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(name) = lookup("MEALDESK_STORE_NAME") {
            self.store_name = name;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mealdesk", "mealdesk")
            .map(|dirs| dirs.config_dir().join("mealdesk.toml"))
    }

    /// Formats an amount with the configured symbol.
    ///
    /// ## Example
    /// ```rust
    /// use mealdesk_cli::config::CliConfig;
    /// use mealdesk_core::Money;
    ///
    /// let config = CliConfig::default();
    /// assert_eq!(config.format_currency(Money::from_units(-5)), "-$5");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}{}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            amount.units().abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_currency() {
        let mut config = CliConfig::default();
        assert_eq!(config.format_currency(Money::from_units(270)), "$270");
        assert_eq!(config.format_currency(Money::zero()), "$0");

        config.currency_symbol = "NT$".to_string();
        assert_eq!(config.format_currency(Money::from_units(-5)), "-NT$5");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("MEALDESK_CATALOG", "/tmp/menu.toml"),
            ("MEALDESK_CURRENCY_SYMBOL", "NT$"),
        ]
        .into_iter()
        .collect();

        let mut config = CliConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.catalog, Some(PathBuf::from("/tmp/menu.toml")));
        assert_eq!(config.currency_symbol, "NT$");
        assert_eq!(config.store_name, "mealdesk");
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let config: CliConfig = toml::from_str(r#"store_name = "中山店""#).unwrap();
        assert_eq!(config.store_name, "中山店");
        assert_eq!(config.currency_symbol, "$");
        assert!(config.catalog.is_none());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let path = std::env::temp_dir().join("mealdesk-missing-config.toml");
        assert!(matches!(
            CliConfig::from_file(&path),
            Err(CliError::ReadFailed { .. })
        ));
    }

    #[test]
    fn test_invalid_config_file() {
        let path = std::env::temp_dir().join(format!("mealdesk-config-{}.toml", std::process::id()));
        std::fs::write(&path, "store_name = [").unwrap();
        let result = CliConfig::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(CliError::InvalidConfig { .. })));
    }
}
