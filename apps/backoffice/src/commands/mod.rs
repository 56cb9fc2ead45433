//! # Back Office Commands
//!
//! Every action a user can take, as plain async functions.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── product.rs  ◄─── Catalog browse, search, CRUD
//! ├── sale.rs     ◄─── register_sale
//! ├── report.rs   ◄─── Aggregate report, sales report
//! └── user.rs     ◄─── login, accounts
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  let session = login(&state, "ana", "s3cret").await?;                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  register_sale(&state, &session, product_id, 3)                         │
//! │         │                                                               │
//! │         ├── session.require(Capability::RegisterSale)?                  │
//! │         │      └── client → ApiError { code: FORBIDDEN }                │
//! │         │                                                               │
//! │         ├── shelf-db (SaleEngine / repositories)                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  serde-serializable result for the CLI or any UI                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `login` is the only command that takes no session.

pub mod product;
pub mod report;
pub mod sale;
pub mod user;

pub use product::{
    delete_product, get_product, list_products, list_products_in_stock, search_products,
    update_product, upsert_product, ProductDto, ProductInput,
};
pub use report::{get_aggregate_report, get_sales_report};
pub use sale::{register_sale, SaleResponse};
pub use user::{create_user, list_users, login};
