//! # Domain Types
//!
//! Core domain types used throughout Shelf.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │◄──│  product_id     │   │  id (i64)       │       │
//! │  │  name, brand    │   │  quantity       │──►│  username       │       │
//! │  │  price_cents    │   │  total_value    │   │  role           │       │
//! │  │  quantity       │   │  user_id        │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Arrows are SOFT references: deleting a product leaves its sales.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::sale::StockSnapshot;
use crate::session::Role;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Stable identifier assigned at creation.
    pub id: i64,

    pub name: String,

    pub brand: String,

    /// Style category (e.g. "Perfumaria", "Skincare").
    pub style: String,

    /// Type category (e.g. "Body splash").
    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub product_type: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Quantity on hand.
    pub quantity: i64,

    /// Free-form date text as entered by staff.
    pub expiration_date: Option<String>,

    /// Opaque image bytes; the UI owns decoding.
    pub image: Option<Vec<u8>>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Price × quantity on hand.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price().multiply_quantity(self.quantity)
    }

    /// Whether at least one unit can be sold.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// The part of the product the sale planner needs.
    pub fn stock_snapshot(&self) -> StockSnapshot {
        StockSnapshot {
            product_id: self.id,
            unit_price: self.price(),
            on_hand: self.quantity,
        }
    }
}

/// Editable product columns, excluding id and image.
///
/// Used by both upsert and partial update; the image travels separately
/// because the two operations treat an absent image differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductFields {
    pub name: String,
    pub brand: String,
    pub style: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub price_cents: i64,
    pub quantity: i64,
    pub expiration_date: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// One completed sale in the ledger. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    /// Auto-assigned, monotonically increasing.
    pub id: i64,

    /// Soft reference; may point at a deleted product.
    pub product_id: i64,

    pub quantity: i64,

    /// Unit price at sale time × quantity (frozen).
    pub total_value_cents: i64,

    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,

    /// Acting user, if the sale was made in a session.
    pub user_id: Option<i64>,
}

impl Sale {
    /// Returns the frozen total as Money.
    #[inline]
    pub fn total_value(&self) -> Money {
        Money::from_cents(self.total_value_cents)
    }
}

/// A sale about to be appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub product_id: i64,
    pub quantity: i64,
    pub total_value: Money,
    pub sale_date: DateTime<Utc>,
    pub user_id: Option<i64>,
}

/// A ledger row joined with the names it refers to.
///
/// Product and user names are `None` when the referenced row is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleReportRow {
    pub id: i64,
    pub product_id: i64,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub total_value_cents: i64,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    pub user_name: Option<String>,
}

// =============================================================================
// User
// =============================================================================

/// A user account as seen outside the authentication gateway.
///
/// The password hash never leaves the database crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    /// Display name.
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub profile_image: Option<Vec<u8>>,
}

/// Optional profile attributes collected at sign-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub birth_date: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub profile_image: Option<Vec<u8>>,
}

/// Input for creating a user. The password is plain text here and is
/// hashed before it reaches the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub name: Option<String>,
    #[serde(default)]
    pub profile: UserProfile,
}

// =============================================================================
// Unit Tests
// =============================================================================
