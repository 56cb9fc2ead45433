//! # shelf-db: Database Layer for Shelf
//!
//! SQLite storage for the catalog, the sale ledger and user accounts,
//! plus the transactional sale engine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shelf Data Flow                                  │
//! │                                                                         │
//! │  Backoffice command (register_sale)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     shelf-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  SaleEngine  │  │   │
//! │  │   │   (pool.rs)   │    │ product, sale │    │ (engine.rs)  │  │   │
//! │  │   │ SqlitePool    │◄───│ user          │    │ one tx/sale  │  │   │
//! │  │   │ migrations    │    │ AuthGateway   │    │ + retry      │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  shelf.db (WAL)                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shelf_db::{Database, DbConfig, SaleEngineConfig};
//!
//! let db = Database::new(DbConfig::new("shelf.db")).await?;
//!
//! let products = db.products().list().await?;
//! let sale = db
//!     .sale_engine(SaleEngineConfig::default())
//!     .register_sale(products[0].id, 1, None)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use auth::AuthGateway;
pub use engine::{SaleEngine, SaleEngineConfig, SaleError};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DEFAULT_BUSY_TIMEOUT};

pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::user::UserRepository;
