//! # Back Office Configuration
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.
//!
//! | Variable                       | Default                          |
//! |--------------------------------|----------------------------------|
//! | `SHELF_DB_PATH`                | `<platform data dir>/shelf.db`   |
//! | `SHELF_MAX_CONNECTIONS`        | `5`                              |
//! | `SHELF_BUSY_TIMEOUT_MS`        | `5000`                           |
//! | `SHELF_SALE_MAX_ATTEMPTS`      | `3`                              |
//! | `SHELF_SALE_RETRY_BACKOFF_MS`  | `50`                             |
//! | `SHELF_RECENT_SALES_WINDOW`    | `10`                             |
//! | `SHELF_ADMIN_USERNAME`         | `admin`                          |
//! | `SHELF_ADMIN_PASSWORD`         | `admin123`                       |
//! | `SHELF_STORE_NAME`             | `Shelf`                          |

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use shelf_core::DEFAULT_RECENT_SALES_WINDOW;
use shelf_db::{DbConfig, SaleEngineConfig};

/// Back office configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Write-lock wait in milliseconds
    pub busy_timeout_ms: u64,

    /// Sale transaction tries, including the first
    pub sale_max_attempts: u32,

    /// Pause between sale tries in milliseconds
    pub sale_retry_backoff_ms: u64,

    /// Entries in the report's recent sales list
    pub recent_sales_window: usize,

    /// Bootstrap admin account, created when missing
    pub admin_username: String,
    pub admin_password: String,

    /// Shown in report headers
    pub store_name: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let db_path = match env::var("SHELF_DB_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_db_path()?,
        };

        let config = AppConfig {
            db_path,
            max_connections: parse_var("SHELF_MAX_CONNECTIONS", 5)?,
            busy_timeout_ms: parse_var("SHELF_BUSY_TIMEOUT_MS", 5000)?,
            sale_max_attempts: parse_var("SHELF_SALE_MAX_ATTEMPTS", 3)?,
            sale_retry_backoff_ms: parse_var("SHELF_SALE_RETRY_BACKOFF_MS", 50)?,
            recent_sales_window: parse_var("SHELF_RECENT_SALES_WINDOW", DEFAULT_RECENT_SALES_WINDOW)?,
            admin_username: env::var("SHELF_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            // The bootstrap password is only used once, to create the account.
            admin_password: env::var("SHELF_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            store_name: env::var("SHELF_STORE_NAME").unwrap_or_else(|_| "Shelf".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Defaults with the given database path; no environment access.
    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        AppConfig {
            db_path: path.into(),
            max_connections: 5,
            busy_timeout_ms: 5000,
            sale_max_attempts: 3,
            sale_retry_backoff_ms: 50,
            recent_sales_window: DEFAULT_RECENT_SALES_WINDOW,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            store_name: "Shelf".to_string(),
        }
    }

    /// Checks value ranges that parsing alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("SHELF_MAX_CONNECTIONS".to_string()));
        }
        if self.sale_max_attempts == 0 {
            return Err(ConfigError::InvalidValue("SHELF_SALE_MAX_ATTEMPTS".to_string()));
        }
        if self.admin_username.trim().is_empty() {
            return Err(ConfigError::MissingRequired("SHELF_ADMIN_USERNAME".to_string()));
        }
        Ok(())
    }

    /// Pool settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path)
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }

    /// Sale retry policy derived from this configuration.
    pub fn sale_engine_config(&self) -> SaleEngineConfig {
        SaleEngineConfig {
            max_attempts: self.sale_max_attempts,
            retry_backoff: Duration::from_millis(self.sale_retry_backoff_ms),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Platform data directory for the database file.
///
/// - **macOS**: `~/Library/Application Support/com.shelf.backoffice/shelf.db`
/// - **Windows**: `%APPDATA%\shelf\backoffice\data\shelf.db`
/// - **Linux**: `~/.local/share/backoffice/shelf.db`
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("com", "shelf", "backoffice")
        .ok_or_else(|| ConfigError::MissingRequired("SHELF_DB_PATH".to_string()))?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {}", data_dir.display(), e)))?;

    Ok(data_dir.join("shelf.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Cannot create data directory {0}")]
    DataDir(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::with_db_path("/tmp/shelf.db");
        assert!(config.validate().is_ok());

        let engine = config.sale_engine_config();
        assert_eq!(engine.max_attempts, 3);
        assert_eq!(engine.retry_backoff, Duration::from_millis(50));

        let db = config.db_config();
        assert_eq!(db.max_connections, 5);
        assert_eq!(db.busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = AppConfig::with_db_path("/tmp/shelf.db");
        config.sale_max_attempts = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_parse_var_default_when_unset() {
        let value: u32 = parse_var("SHELF_TEST_SURELY_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }
}
