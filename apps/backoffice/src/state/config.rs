//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Load Order (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`backoffice.toml` in the platform config dir, or an
//!    explicit path)
//! 3. Environment variables (`BACKOFFICE_*`)
//!
//! ## Configuration File Format
//! ```toml
//! # backoffice.toml
//! store_name = "Gulberg Mart"
//! currency_code = "PKR"
//! currency_symbol = "Rs "
//! page_size = 25
//! seed_fixtures = true
//! ```
//!
//! Configuration is read-only after startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use backoffice_core::table::{TableOptions, DEFAULT_PAGE_SIZE_OPTIONS};
use backoffice_core::Money;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Store name (shown in the dashboard header)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Rows per page when a table first opens
    pub page_size: usize,

    /// Choices offered by the page-size dropdown
    pub page_size_options: Vec<usize>,

    /// Load the mock records at startup
    pub seed_fixtures: bool,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "Back Office Dev Store"
    /// - Currency: PKR (Rs)
    /// - Page size: 10 of [5, 10, 25, 50, 100]
    /// - Fixtures: seeded
    fn default() -> Self {
        ConfigState {
            store_name: "Back Office Dev Store".to_string(),
            currency_code: "PKR".to_string(),
            currency_symbol: "Rs ".to_string(),
            page_size: 10,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            seed_fixtures: true,
        }
    }
}

impl ConfigState {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_name.trim().is_empty() {
            return Err(ConfigError::Invalid("store_name must not be empty".into()));
        }

        if self.page_size_options.is_empty() || self.page_size_options.contains(&0) {
            return Err(ConfigError::Invalid(
                "page_size_options must be non-empty and above zero".into(),
            ));
        }

        if !self.page_size_options.contains(&self.page_size) {
            return Err(ConfigError::Invalid(format!(
                "page_size {} is not one of {:?}",
                self.page_size, self.page_size_options
            )));
        }

        Ok(())
    }

    /// Applies `BACKOFFICE_*` overrides from `lookup`.
    ///
    /// ## Variables
    /// - `BACKOFFICE_STORE_NAME`
    /// - `BACKOFFICE_CURRENCY_SYMBOL`
    /// - `BACKOFFICE_PAGE_SIZE`
    /// - `BACKOFFICE_SEED` (`true`/`false`/`1`/`0`)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("BACKOFFICE_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(symbol) = lookup("BACKOFFICE_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(size) = lookup("BACKOFFICE_PAGE_SIZE") {
            match size.trim().parse::<usize>() {
                Ok(size) => {
                    debug!(page_size = size, "Overriding page size from environment");
                    self.page_size = size;
                }
                Err(_) => warn!(value = %size, "Ignoring non-numeric BACKOFFICE_PAGE_SIZE"),
            }
        }

        if let Some(seed) = lookup("BACKOFFICE_SEED") {
            match seed.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => self.seed_fixtures = true,
                "0" | "false" | "no" => self.seed_fixtures = false,
                other => warn!(value = %other, "Ignoring unknown BACKOFFICE_SEED"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "backoffice", "backoffice")
            .map(|dirs| dirs.config_dir().join("backoffice.toml"))
    }

    /// Table options every page starts from.
    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            page_size: self.page_size,
            page_size_options: self.page_size_options.clone(),
            ..TableOptions::default()
        }
    }

    /// Formats an amount with the configured symbol.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::Money;
    /// use backoffice_lib::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_minor(123_450)), "Rs 1,234.50");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let major = amount.major().unsigned_abs().to_string();

        let mut grouped = String::with_capacity(major.len() + major.len() / 3);
        for (i, digit) in major.chars().enumerate() {
            if i > 0 && (major.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        format!(
            "{}{}{}.{:02}",
            sign,
            self.currency_symbol,
            grouped,
            amount.minor_part().abs()
        )
    }
}
