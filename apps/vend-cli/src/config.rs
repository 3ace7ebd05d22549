//! # Machine Configuration
//!
//! Start-up settings for the console machine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VEND_INITIAL_COINS=10,10,10,10,10,10,10,10,10                      │
//! │     VEND_PROMPT="> "                                                   │
//! │     VEND_ECHO_LEDGER=false                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, else                                              │
//! │     ~/.config/coinvend/vend.toml (Linux)                               │
//! │     ~/Library/Application Support/com.coinvend.vend/vend.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     1p×1 2p×2 5p×5 10p×1 20p×2 50p×5 £1×1 £2×2 £5×5                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # vend.toml
//! # 1p, 2p, 5p, 10p, 20p, 50p, £1, £2, £5
//! initial_coins = [10, 10, 10, 10, 10, 10, 10, 10, 10]
//! prompt = "vend> "
//! echo_ledger = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use vend_core::validation::{parse_quantity_list, validate_inventory_spec};
use vend_core::{ValidationError, DEFAULT_FLOAT};

/// Console machine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Coins loaded at start-up, ascending by denomination.
    pub initial_coins: Vec<i64>,

    /// Text printed before each command.
    pub prompt: String,

    /// Print the session's deposited/dispensed coins after each operation.
    pub echo_ledger: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            initial_coins: DEFAULT_FLOAT.to_vec(),
            prompt: "> ".to_string(),
            echo_ledger: true,
        }
    }
}

impl MachineConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (vend.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            // An explicit path must exist.
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

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading machine config from file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parses TOML text. Missing keys take their default values.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies overrides looked up by variable name.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(coins) = lookup("VEND_INITIAL_COINS") {
            debug!(coins = %coins, "Overriding initial coins from environment");
            self.initial_coins = parse_quantity_list(&coins)?;
        }

        if let Some(prompt) = lookup("VEND_PROMPT") {
            self.prompt = prompt;
        }

        if let Some(echo) = lookup("VEND_ECHO_LEDGER") {
            match echo.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.echo_ledger = true,
                "0" | "false" | "no" | "off" => self.echo_ledger = false,
                _ => warn!(value = %echo, "Unknown VEND_ECHO_LEDGER value, ignoring"),
            }
        }

        Ok(())
    }

    /// Validates the configuration.
    ///
    /// The coin vector goes through the same check the engine uses, so a bad
    /// file is reported before the machine is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_inventory_spec(&self.initial_coins)?;
        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "coinvend", "vend")
            .map(|dirs| dirs.config_dir().join("vend.toml"))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = MachineConfig::default();
        assert_eq!(config.initial_coins, vec![1, 2, 5, 1, 2, 5, 1, 2, 5]);
        assert!(config.echo_ledger);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_parsing() {
        let config = MachineConfig::from_toml(
            r#"
            initial_coins = [10, 10, 10, 10, 10, 10, 10, 10, 10]
            prompt = "vend> "
            "#,
        )
        .unwrap();

        assert_eq!(config.initial_coins, vec![10; 9]);
        assert_eq!(config.prompt, "vend> ");
        // Not in the file, so default.
        assert!(config.echo_ledger);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MachineConfig {
            initial_coins: vec![0; 9],
            prompt: "$ ".to_string(),
            echo_ledger: false,
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(MachineConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            MachineConfig::from_toml("initial_coins = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_vectors() {
        let mut config = MachineConfig::default();

        config.initial_coins = vec![1, 2, 3, 4, 5];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.initial_coins = vec![0, 0, 0, 0, 0, 0, 0, 0, -1];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            ("VEND_INITIAL_COINS", "0,0,0,0,0,0,0,0,3"),
            ("VEND_PROMPT", "coins? "),
            ("VEND_ECHO_LEDGER", "off"),
        ]);

        let mut config = MachineConfig::default();
        config.apply_overrides(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.initial_coins, vec![0, 0, 0, 0, 0, 0, 0, 0, 3]);
        assert_eq!(config.prompt, "coins? ");
        assert!(!config.echo_ledger);
    }

    #[test]
    fn test_env_override_bad_number() {
        let vars = env(&[("VEND_INITIAL_COINS", "1,two,3")]);
        let mut config = MachineConfig::default();

        let err = config.apply_overrides(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert_eq!(config.initial_coins, DEFAULT_FLOAT.to_vec());
    }

    #[test]
    fn test_unknown_echo_value_is_ignored() {
        let vars = env(&[("VEND_ECHO_LEDGER", "maybe")]);
        let mut config = MachineConfig::default();
        config.apply_overrides(|k| vars.get(k).cloned()).unwrap();
        assert!(config.echo_ledger);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = PathBuf::from("/definitely/not/here/vend.toml");
        assert!(matches!(
            MachineConfig::load(Some(path)),
            Err(ConfigError::Io(_))
        ));
    }
}
