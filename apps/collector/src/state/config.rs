//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`COLLECTOR_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use directories::ProjectDirs;
use fare_core::Money;
use serde::Serialize;

use crate::error::ApiError;

/// Environment variable overriding the SQLite database path.
pub const ENV_DB_PATH: &str = "COLLECTOR_DB_PATH";
/// Set to `1`/`true` to keep the trip in memory only.
pub const ENV_IN_MEMORY: &str = "COLLECTOR_IN_MEMORY";
/// Currency symbol shown after amounts.
pub const ENV_CURRENCY: &str = "COLLECTOR_CURRENCY";

const DATABASE_FILE: &str = "trips.db";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Explicit database path. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Skip SQLite and keep the trip in a memory store.
    pub in_memory: bool,

    /// Currency symbol (for display). Amounts are whole units.
    pub currency_symbol: String,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            database_path: None,
            in_memory: false,
            currency_symbol: "Br".to_string(),
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup(ENV_IN_MEMORY) {
            config.in_memory = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }

        if let Some(symbol) = lookup(ENV_CURRENCY).filter(|s| !s.trim().is_empty()) {
            config.currency_symbol = symbol.trim().to_string();
        }

        config
    }

    /// Resolves where the SQLite file lives.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.fare.collector/trips.db`
    /// - **Windows**: `%APPDATA%\fare\collector\data\trips.db`
    /// - **Linux**: `~/.local/share/collector/trips.db`
    pub fn resolve_database_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let proj_dirs = ProjectDirs::from("com", "fare", "collector")
            .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE))
    }

    /// Formats a whole-unit amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use fare_collector::state::ConfigState;
    /// use fare_core::Money;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_amount(Money::from_units(35)), "35 Br");
    /// ```
    pub fn format_amount(&self, amount: Money) -> String {
        format!("{} {}", amount, self.currency_symbol)
    }
}
