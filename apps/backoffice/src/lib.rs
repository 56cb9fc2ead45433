//! # Shelf Back Office Library
//!
//! Role-checked commands over the Shelf catalog, sale engine and reports.
//! The `shelf` binary is one front end; any UI can embed this crate and
//! call the same commands.
//!
//! ## Module Organization
//! ```text
//! shelf_backoffice/
//! ├── lib.rs          ◄─── You are here (exports, tracing setup)
//! ├── config.rs       ◄─── Environment-driven AppConfig
//! ├── state.rs        ◄─── AppState: Database + AppConfig
//! ├── error.rs        ◄─── API error type for commands
//! ├── seed.rs         ◄─── Demo catalog for a fresh install
//! └── commands/
//!     ├── product.rs  ◄─── Catalog browse, search, CRUD
//!     ├── sale.rs     ◄─── register_sale
//!     ├── report.rs   ◄─── Aggregate and sales reports
//!     └── user.rs     ◄─── login, accounts
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. init_tracing()            RUST_LOG or "info,shelf=debug,sqlx=warn"  │
//! │  2. AppConfig::load()         SHELF_* environment variables             │
//! │  3. AppState::open(config)    connect, migrate, bootstrap admin         │
//! │  4. login(&state, user, pw)   → Session                                 │
//! │  5. command(&state, &session, ...)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod seed;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays clean for command output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shelf=trace` - Show trace for shelf crates only
/// - Default: `info,shelf=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shelf=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
