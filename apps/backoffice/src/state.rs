//! # Application State
//!
//! Everything a command needs besides the caller's [`Session`]:
//! the database handle and the loaded configuration.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState                                                               │
//! │  ├── db: Database            (SqlitePool inside, cheap to clone)       │
//! │  └── config: AppConfig       (read-only after startup)                 │
//! │                                                                         │
//! │  There is no "current user" in here. The session travels as an        │
//! │  argument into every command.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Session`]: shelf_core::Session

use tracing::info;

use shelf_db::{Database, DbResult, SaleEngine};

use crate::config::AppConfig;

/// Shared state for all commands.
#[derive(Debug, Clone)]
pub struct AppState {
    db: Database,
    config: AppConfig,
}

impl AppState {
    /// Opens the database described by `config` and bootstraps the admin
    /// account.
    pub async fn open(config: AppConfig) -> DbResult<Self> {
        let db = Database::new(config.db_config()).await?;
        let state = AppState::with_database(db, config);
        state.bootstrap().await?;
        Ok(state)
    }

    /// Wraps an already-open database (tests, embedding).
    pub fn with_database(db: Database, config: AppConfig) -> Self {
        AppState { db, config }
    }

    /// Creates the configured admin account if it does not exist yet.
    pub async fn bootstrap(&self) -> DbResult<()> {
        let created = self
            .db
            .auth()
            .ensure_default_admin(&self.config.admin_username, &self.config.admin_password)
            .await?;

        if created {
            info!(username = %self.config.admin_username, "Bootstrap admin account created");
        }
        Ok(())
    }

    /// The database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// A sale engine with the configured retry policy.
    pub fn sale_engine(&self) -> SaleEngine {
        self.db.sale_engine(self.config.sale_engine_config())
    }
}
