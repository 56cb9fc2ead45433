//! # Sale Repository
//!
//! The sale ledger: append-only, read for reports.
//!
//! ## Ledger Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  • Rows are only ever INSERTed, never updated or deleted               │
//! │  • total_value_cents is frozen at sale time                            │
//! │  • product_id / user_id may point at rows that no longer exist         │
//! │  • Inserts happen inside the SaleEngine transaction (append)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use shelf_core::{NewSale, Sale, SaleReportRow};

const SALE_COLUMNS: &str = "id, product_id, quantity, total_value_cents, sale_date, user_id";

/// Repository for sale ledger reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Appends a sale on the caller's connection.
    ///
    /// Takes a connection rather than the pool so the insert joins the
    /// caller's transaction (`&mut *tx`).
    pub async fn append(conn: &mut SqliteConnection, sale: &NewSale) -> DbResult<Sale> {
        let result = sqlx::query(
            r#"
            INSERT INTO sales (product_id, quantity, total_value_cents, sale_date, user_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(sale.product_id)
        .bind(sale.quantity)
        .bind(sale.total_value.cents())
        .bind(sale.sale_date)
        .bind(sale.user_id)
        .execute(conn)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, product_id = sale.product_id, "Appended sale");

        Ok(Sale {
            id,
            product_id: sale.product_id,
            quantity: sale.quantity,
            total_value_cents: sale.total_value.cents(),
            sale_date: sale.sale_date,
            user_id: sale.user_id,
        })
    }

    /// Every sale, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales ORDER BY id");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Gets a sale by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Sales of one product, oldest first. Works for deleted products too.
    pub async fn list_for_product(&self, product_id: i64) -> DbResult<Vec<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE product_id = ?1 ORDER BY id");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Ledger joined with product and user names, newest first.
    ///
    /// Names come back `None` for deleted products or users.
    pub async fn report_rows(&self) -> DbResult<Vec<SaleReportRow>> {
        let rows = sqlx::query_as::<_, SaleReportRow>(
            r#"
            SELECT
                s.id,
                s.product_id,
                p.name AS product_name,
                s.quantity,
                s.total_value_cents,
                s.sale_date,
                COALESCE(u.name, u.username) AS user_name
            FROM sales s
            LEFT JOIN products p ON p.id = s.product_id
            LEFT JOIN users u ON u.id = s.user_id
            ORDER BY s.sale_date DESC, s.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Number of sales in the ledger.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, TimeZone, Utc};
    use shelf_core::Money;

    fn new_sale(product_id: i64, quantity: i64, cents: i64, minutes: i64) -> NewSale {
        NewSale {
            product_id,
            quantity,
            total_value: Money::from_cents(cents),
            sale_date: Utc.with_ymd_and_hms(2026, 5, 2, 10, 0, 0).unwrap()
                + Duration::minutes(minutes),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let sale = SaleRepository::append(&mut *conn, &new_sale(7, 2, 3000, 0))
            .await
            .unwrap();
        drop(conn);

        let stored = db.sales().get_by_id(sale.id).await.unwrap().unwrap();
        assert_eq!(stored, sale);
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_report_rows_for_missing_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        SaleRepository::append(&mut *conn, &new_sale(99, 1, 500, 0)).await.unwrap();
        SaleRepository::append(&mut *conn, &new_sale(99, 1, 500, 5)).await.unwrap();
        drop(conn);

        let rows = db.sales().report_rows().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.product_name.is_none() && r.user_name.is_none()));
        assert!(rows[0].sale_date > rows[1].sale_date);

        assert_eq!(db.sales().list_for_product(99).await.unwrap().len(), 2);
        assert!(db.sales().list_for_product(1).await.unwrap().is_empty());
    }
}
