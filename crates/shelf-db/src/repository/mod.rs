//! # Repository Module
//!
//! Database repository implementations for Shelf.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Backoffice command                                                    │
//! │       │                                                                 │
//! │       │  db.products().search("natura")                                │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── upsert / update / delete                                          │
//! │  ├── list / list_in_stock / get_by_id                                  │
//! │  └── search / count                                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD and search
//! - [`SaleRepository`](sale::SaleRepository) - Append-only sale ledger
//! - [`UserRepository`](user::UserRepository) - Accounts (hashes stay private)

pub mod product;
pub mod sale;
pub mod user;
