//! # shelf-core: Pure Business Logic for Shelf
//!
//! Every rule that decides whether stock may move lives here, as plain
//! functions with zero I/O. The database crate executes what this crate
//! decides.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Shelf Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               UI (external: views, forms, exports)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             apps/backoffice (commands + Session)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shelf-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │  sale   │ │ session  │ │ report │  │   │
//! │  │   │ Product │ │  Money  │ │SalePlan │ │ Role     │ │Aggreg. │  │   │
//! │  │   │ Sale    │ │         │ │         │ │ Session  │ │ Report │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shelf-db (Database Layer)                    │   │
//! │  │     SQLite, migrations, repositories, sale transaction engine   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, User)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation
//! - [`sale`] - Stock check and snapshot pricing for a single sale
//! - [`session`] - Roles, capabilities and the explicit caller session
//! - [`report`] - Reporting aggregator
//! - [`catalog`] - Suggested brand, style and type lists
//!
//! ## Example Usage
//!
//! ```rust
//! use shelf_core::money::Money;
//! use shelf_core::sale::{plan_sale, StockSnapshot};
//!
//! let snapshot = StockSnapshot {
//!     product_id: 1,
//!     unit_price: Money::from_cents(500),
//!     on_hand: 10,
//! };
//!
//! let plan = plan_sale(&snapshot, 3).unwrap();
//! assert_eq!(plan.total.cents(), 1500);
//! assert_eq!(plan.remaining, 7);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod report;
pub mod sale;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::AggregateReport;
pub use sale::{plan_sale, SalePlan, StockSnapshot};
pub use session::{Capability, Role, Session};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of entries in the "recent sales" section of the aggregate report.
pub const DEFAULT_RECENT_SALES_WINDOW: usize = 10;
