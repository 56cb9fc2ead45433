//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Upsert (create, or replace by id)
//! - Partial update that keeps the stored image unless a new one is given
//! - Idempotent delete
//! - Case-insensitive search on name and brand
//!
//! ## Upsert vs Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  upsert(fields, image, None)      → INSERT, new id                     │
//! │  upsert(fields, image, Some(id))  → INSERT OR REPLACE: the whole row   │
//! │                                     is overwritten, image included     │
//! │  update(id, fields, None)         → image column untouched             │
//! │  update(id, fields, Some(bytes))  → image replaced                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock written here is an administrative override within
//! `0..=MAX_STOCK_QUANTITY`; prices within `0..=MAX_PRICE_CENTS`. Only the
//! sale engine decrements stock.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use shelf_core::validation::{validate_product_fields, validate_search_query};
use shelf_core::{Product, ProductFields};

const PRODUCT_COLUMNS: &str =
    "id, name, brand, style, type, price_cents, quantity, expiration_date, image";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let created = repo.upsert(&fields, None, None).await?;
/// let found = repo.search("natura").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product, or fully replaces the product with the given id.
    ///
    /// With `Some(id)` the row is written with that id whether or not it
    /// existed; anything not supplied (including the image) is lost.
    pub async fn upsert(
        &self,
        fields: &ProductFields,
        image: Option<&[u8]>,
        id: Option<i64>,
    ) -> DbResult<Product> {
        validate_product_fields(fields)?;

        let id = match id {
            Some(id) => {
                let replaced = self.exists(id).await?;
                sqlx::query(
                    r#"
                    INSERT OR REPLACE INTO products (
                        id, name, brand, style, type,
                        price_cents, quantity, expiration_date, image
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                )
                .bind(id)
                .bind(&fields.name)
                .bind(&fields.brand)
                .bind(&fields.style)
                .bind(&fields.product_type)
                .bind(fields.price_cents)
                .bind(fields.quantity)
                .bind(&fields.expiration_date)
                .bind(image)
                .execute(&self.pool)
                .await?;

                if replaced {
                    info!(id, name = %fields.name, "Replaced product");
                } else {
                    debug!(id, name = %fields.name, "Inserted product with caller id");
                }
                id
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO products (
                        name, brand, style, type,
                        price_cents, quantity, expiration_date, image
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    "#,
                )
                .bind(&fields.name)
                .bind(&fields.brand)
                .bind(&fields.style)
                .bind(&fields.product_type)
                .bind(fields.price_cents)
                .bind(fields.quantity)
                .bind(&fields.expiration_date)
                .bind(image)
                .execute(&self.pool)
                .await?;

                let id = result.last_insert_rowid();
                debug!(id, name = %fields.name, "Inserted product");
                id
            }
        };

        Ok(Product {
            id,
            name: fields.name.clone(),
            brand: fields.brand.clone(),
            style: fields.style.clone(),
            product_type: fields.product_type.clone(),
            price_cents: fields.price_cents,
            quantity: fields.quantity,
            expiration_date: fields.expiration_date.clone(),
            image: image.map(<[u8]>::to_vec),
        })
    }

    /// Lists every product, ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Lists products with at least one unit on hand, ordered by name.
    pub async fn list_in_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE quantity > 0 ORDER BY name, id"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Overwrites the editable fields of an existing product.
    ///
    /// `image = None` keeps the stored image.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No product with that id
    pub async fn update(
        &self,
        id: i64,
        fields: &ProductFields,
        image: Option<&[u8]>,
    ) -> DbResult<Product> {
        validate_product_fields(fields)?;

        let result = match image {
            Some(bytes) => {
                sqlx::query(
                    r#"
                    UPDATE products SET
                        name = ?2, brand = ?3, style = ?4, type = ?5,
                        price_cents = ?6, quantity = ?7, expiration_date = ?8,
                        image = ?9
                    WHERE id = ?1
                    "#,
                )
                .bind(id)
                .bind(&fields.name)
                .bind(&fields.brand)
                .bind(&fields.style)
                .bind(&fields.product_type)
                .bind(fields.price_cents)
                .bind(fields.quantity)
                .bind(&fields.expiration_date)
                .bind(bytes)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    UPDATE products SET
                        name = ?2, brand = ?3, style = ?4, type = ?5,
                        price_cents = ?6, quantity = ?7, expiration_date = ?8
                    WHERE id = ?1
                    "#,
                )
                .bind(id)
                .bind(&fields.name)
                .bind(&fields.brand)
                .bind(&fields.style)
                .bind(&fields.product_type)
                .bind(fields.price_cents)
                .bind(fields.quantity)
                .bind(&fields.expiration_date)
                .execute(&self.pool)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        debug!(id, image_replaced = image.is_some(), "Updated product");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product. Deleting a missing id is a no-op.
    ///
    /// Sales referencing the product are left in the ledger.
    ///
    /// ## Returns
    /// Whether a row was removed.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(id, "Deleted product");
        } else {
            debug!(id, "Delete of missing product ignored");
        }

        Ok(removed)
    }

    /// Case-insensitive substring search on name and brand.
    ///
    /// An empty query returns the full catalog. `%` and `_` typed by the
    /// user match literally.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        let query = validate_search_query(query)?;

        if query.is_empty() {
            return self.list().await;
        }

        debug!(query = %query, "Searching products");

        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE lower(name) LIKE ?1 ESCAPE '\'
               OR lower(brand) LIKE ?1 ESCAPE '\'
            ORDER BY name, id
            "#
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Counts products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }
}

/// Escapes LIKE wildcards so they match literally under `ESCAPE '\'`.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shelf_core::ValidationError;

    fn fields(name: &str, brand: &str, price_cents: i64, quantity: i64) -> ProductFields {
        ProductFields {
            name: name.to_string(),
            brand: brand.to_string(),
            style: "Perfumaria".to_string(),
            product_type: "Colônia".to_string(),
            price_cents,
            quantity,
            expiration_date: Some("2027-12".to_string()),
        }
    }

    async fn repo() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let repo = repo().await;
        let a = repo.upsert(&fields("Kaiak", "Natura", 12990, 4), None, None).await.unwrap();
        let b = repo.upsert(&fields("Malbec", "O Boticário", 18990, 2), None, None).await.unwrap();

        assert!(b.id > a.id);
        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.get_by_id(a.id).await.unwrap().unwrap().name, "Kaiak");
    }

    #[tokio::test]
    async fn test_upsert_with_id_replaces_whole_row() {
        let repo = repo().await;
        let created = repo
            .upsert(&fields("Kaiak", "Natura", 12990, 4), Some(&b"png"[..]), None)
            .await
            .unwrap();

        repo.upsert(&fields("Kaiak Aventura", "Natura", 13990, 9), None, Some(created.id))
            .await
            .unwrap();

        let stored = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Kaiak Aventura");
        assert_eq!(stored.quantity, 9);
        assert_eq!(stored.image, None);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_image_when_absent() {
        let repo = repo().await;
        let created = repo
            .upsert(&fields("Lily", "O Boticário", 21990, 3), Some(&b"jpeg-bytes"[..]), None)
            .await
            .unwrap();

        let updated = repo
            .update(created.id, &fields("Lily Lumière", "O Boticário", 22990, 3), None)
            .await
            .unwrap();
        assert_eq!(updated.image.as_deref(), Some(&b"jpeg-bytes"[..]));
        assert_eq!(updated.price_cents, 22990);

        let replaced = repo
            .update(created.id, &fields("Lily Lumière", "O Boticário", 22990, 3), Some(&b"new"[..]))
            .await
            .unwrap();
        assert_eq!(replaced.image.as_deref(), Some(&b"new"[..]));
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let repo = repo().await;
        let err = repo
            .update(404, &fields("Ghost", "", 100, 1), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let repo = repo().await;
        let err = repo.upsert(&fields("  ", "Natura", 100, 1), None, None).await.unwrap_err();
        assert!(matches!(err, DbError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_negative_price_and_stock_rejected() {
        let repo = repo().await;

        let err = repo.upsert(&fields("Kaiak", "Natura", -500, -7), None, None).await.unwrap_err();
        assert!(matches!(err, DbError::Invalid(ValidationError::OutOfRange { .. })));
        assert_eq!(repo.count().await.unwrap(), 0);

        let p = repo.upsert(&fields("Kaiak", "Natura", 500, 7), None, None).await.unwrap();
        let err = repo.update(p.id, &fields("Kaiak", "Natura", 500, -1), None).await.unwrap_err();
        assert!(matches!(err, DbError::Invalid(_)));
        assert_eq!(repo.get_by_id(p.id).await.unwrap().unwrap().quantity, 7);
    }

    #[tokio::test]
    async fn test_oversized_price_rejected() {
        let repo = repo().await;
        let err = repo
            .upsert(&fields("Kaiak", "Natura", 10_000_000_000_000_000, 1000), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Invalid(ValidationError::OutOfRange { .. })));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = repo().await;
        let created = repo.upsert(&fields("Kaiak", "Natura", 100, 1), None, None).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_name_and_brand_case_insensitive() {
        let repo = repo().await;
        repo.upsert(&fields("Kaiak", "Natura", 100, 1), None, None).await.unwrap();
        repo.upsert(&fields("Malbec", "O Boticário", 100, 1), None, None).await.unwrap();
        repo.upsert(&fields("Ekos Castanha", "NATURA", 100, 0), None, None).await.unwrap();

        assert_eq!(repo.search("natura").await.unwrap().len(), 2);
        assert_eq!(repo.search("MALB").await.unwrap().len(), 1);
        assert_eq!(repo.search("").await.unwrap().len(), 3);
        assert!(repo.search("100%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_in_stock_skips_empty_shelves() {
        let repo = repo().await;
        repo.upsert(&fields("Kaiak", "Natura", 100, 2), None, None).await.unwrap();
        repo.upsert(&fields("Ekos", "Natura", 100, 0), None, None).await.unwrap();

        let in_stock = repo.list_in_stock().await.unwrap();
        assert_eq!(in_stock.len(), 1);
        assert_eq!(in_stock[0].name, "Kaiak");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("plain"), "plain");
    }
}
