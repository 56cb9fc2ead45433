//! # Sale Engine
//!
//! Registers a sale as ONE atomic unit: stock check, stock decrement and
//! ledger append commit together or not at all.
//!
//! ## Transaction Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    1. UPDATE products SET quantity = quantity WHERE id = ?              │
//! │         └── claims SQLite's write lock before anything is read;        │
//! │             a second seller waits here (busy_timeout)                  │
//! │         └── 0 rows → NotFound                                          │
//! │    2. SELECT price_cents, quantity          (snapshot)                 │
//! │    3. plan_sale(snapshot, qty)              (shelf-core)               │
//! │         └── InsufficientStock / InvalidQuantity → rollback             │
//! │    4. UPDATE products SET quantity = quantity - ?                      │
//! │    5. INSERT INTO sales (... total frozen from the snapshot ...)       │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any error before COMMIT drops the transaction → ROLLBACK.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Because step 1 writes, two sellers of the same product are serialized:
//! the second reads stock only after the first has committed. Stock
//! therefore never goes negative and every sale's total uses the price
//! that was current when its own lock was taken.
//!
//! ## Retry
//! Lock timeouts and connection trouble are retried with a fixed backoff,
//! up to `max_attempts`. Business rejections are never retried.

use chrono::Utc;
use sqlx::SqlitePool;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::repository::sale::SaleRepository;
use shelf_core::validation::validate_sale_quantity;
use shelf_core::{plan_sale, CoreError, Money, NewSale, Sale, StockSnapshot};

// =============================================================================
// Configuration
// =============================================================================

/// Retry policy for sale transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleEngineConfig {
    /// Total tries including the first. Values below 1 behave as 1.
    pub max_attempts: u32,
    /// Pause between tries.
    pub retry_backoff: Duration,
}

impl Default for SaleEngineConfig {
    fn default() -> Self {
        SaleEngineConfig {
            max_attempts: 3,
            retry_backoff: Duration::from_millis(50),
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Why a sale was not registered. In every case nothing was written.
#[derive(Debug, Error)]
pub enum SaleError {
    #[error("Product not found: {product_id}")]
    NotFound { product_id: i64 },

    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    #[error("Quantity must be positive, got {requested}")]
    InvalidQuantity { requested: i64 },

    /// Price × quantity does not fit in i64 cents.
    #[error("Sale total for product {product_id} is too large (quantity {requested})")]
    TotalOverflow { product_id: i64, requested: i64 },

    /// The store stayed busy for every attempt.
    #[error("Sale could not be completed after {attempts} attempts: {source}")]
    TransientFailure {
        attempts: u32,
        #[source]
        source: DbError,
    },

    /// Non-retryable storage failure.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl SaleError {
    /// Short stable code for callers that branch on the reason.
    pub fn code(&self) -> &'static str {
        match self {
            SaleError::NotFound { .. } => "NOT_FOUND",
            SaleError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            SaleError::InvalidQuantity { .. } => "INVALID_QUANTITY",
            SaleError::TotalOverflow { .. } => "TOTAL_OVERFLOW",
            SaleError::TransientFailure { .. } => "TRANSIENT_FAILURE",
            SaleError::Storage(_) => "STORAGE",
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Registers sales against the shared pool.
///
/// ## Usage
/// ```rust,ignore
/// let engine = db.sale_engine(SaleEngineConfig::default());
/// match engine.register_sale(product_id, 3, Some(session.actor_id())).await {
///     Ok(sale) => println!("sold for {}", sale.total_value()),
///     Err(SaleError::InsufficientStock { available, .. }) => { /* ... */ }
///     Err(e) => return Err(e.into()),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SaleEngine {
    pool: SqlitePool,
    config: SaleEngineConfig,
}

#[derive(sqlx::FromRow)]
struct StockRow {
    price_cents: i64,
    quantity: i64,
}

impl SaleEngine {
    /// Creates an engine over the pool.
    pub fn new(pool: SqlitePool, config: SaleEngineConfig) -> Self {
        SaleEngine { pool, config }
    }

    /// The retry policy in effect.
    pub fn config(&self) -> SaleEngineConfig {
        self.config
    }

    /// Sells `quantity` units of a product.
    ///
    /// On success the product's stock has dropped by `quantity` and the
    /// returned sale is in the ledger. On any error, neither happened.
    ///
    /// ## Errors
    /// * `InvalidQuantity` - `quantity <= 0`, checked before touching the store
    /// * `NotFound` - No product with that id
    /// * `InsufficientStock` - Stock on hand below `quantity`
    /// * `TransientFailure` - Store busy on every attempt
    /// * `Storage` - Anything else the store reported
    pub async fn register_sale(
        &self,
        product_id: i64,
        quantity: i64,
        actor_id: Option<i64>,
    ) -> Result<Sale, SaleError> {
        validate_sale_quantity(quantity)
            .map_err(|_| SaleError::InvalidQuantity { requested: quantity })?;

        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.try_register(product_id, quantity, actor_id).await {
                Ok(sale) => {
                    info!(
                        sale_id = sale.id,
                        product_id,
                        quantity,
                        total = %sale.total_value(),
                        attempt,
                        "Sale registered"
                    );
                    return Ok(sale);
                }
                Err(SaleError::Storage(e)) if e.is_transient() => {
                    if attempt >= max_attempts {
                        warn!(product_id, attempts = attempt, error = %e, "Sale gave up on busy store");
                        return Err(SaleError::TransientFailure {
                            attempts: attempt,
                            source: e,
                        });
                    }
                    warn!(product_id, attempt, error = %e, "Sale hit busy store, retrying");
                    tokio::time::sleep(self.config.retry_backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    debug!(product_id, quantity, error = %e, "Sale rejected");
                    return Err(e);
                }
            }
        }
    }

    /// One transaction. Returning early drops `tx`, which rolls back.
    async fn try_register(
        &self,
        product_id: i64,
        quantity: i64,
        actor_id: Option<i64>,
    ) -> Result<Sale, SaleError> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // 1. Write lock first, so the read below cannot go stale.
        let claimed = sqlx::query("UPDATE products SET quantity = quantity WHERE id = ?1")
            .bind(product_id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        if claimed.rows_affected() == 0 {
            return Err(SaleError::NotFound { product_id });
        }

        // 2. Snapshot
        let row = sqlx::query_as::<_, StockRow>(
            "SELECT price_cents, quantity FROM products WHERE id = ?1",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::from)?;

        let snapshot = StockSnapshot {
            product_id,
            unit_price: Money::from_cents(row.price_cents),
            on_hand: row.quantity,
        };

        // 3. Decide
        let plan = plan_sale(&snapshot, quantity).map_err(|e| match e {
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => SaleError::InsufficientStock {
                product_id,
                available,
                requested,
            },
            CoreError::ProductNotFound(product_id) => SaleError::NotFound { product_id },
            CoreError::Overflow(_) => SaleError::TotalOverflow {
                product_id,
                requested: quantity,
            },
            CoreError::Validation(_) | CoreError::Forbidden { .. } => {
                SaleError::InvalidQuantity { requested: quantity }
            }
        })?;

        // 4. Decrement
        sqlx::query("UPDATE products SET quantity = quantity - ?2 WHERE id = ?1")
            .bind(product_id)
            .bind(plan.quantity)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        // 5. Append
        let sale = SaleRepository::append(
            &mut *tx,
            &NewSale {
                product_id,
                quantity: plan.quantity,
                total_value: plan.total,
                sale_date: Utc::now(),
                user_id: actor_id,
            },
        )
        .await?;

        tx.commit().await.map_err(DbError::from)?;

        debug!(product_id, remaining = plan.remaining, "Stock after sale");
        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
