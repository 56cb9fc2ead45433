//! # Demo Catalog Seeding
//!
//! Fills an empty catalog with deterministic demo products drawn from the
//! suggested brand, style and type lists. A catalog that already has
//! products is left alone.

use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use shelf_core::catalog::{BRANDS, STYLES, TYPES};
use shelf_core::{Capability, ProductFields, Session};

/// Products created when no count is given.
pub const DEFAULT_SEED_COUNT: usize = 24;

/// Outcome of [`seed_catalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub created: usize,
    /// Products that were already there (seeding skipped when > 0).
    pub existing: i64,
}

/// The `index`-th demo product. Same index, same product.
pub fn demo_product(index: usize) -> ProductFields {
    let brand = BRANDS[index % BRANDS.len()];
    let style = STYLES[(index * 3) % STYLES.len()];
    let product_type = TYPES[(index * 7) % TYPES.len()];

    ProductFields {
        name: format!("{} {} #{}", product_type, brand, index + 1),
        brand: brand.to_string(),
        style: style.to_string(),
        product_type: product_type.to_string(),
        // 9.90 .. 99.80, always ending in 0
        price_cents: 990 + ((index as i64 * 437) % 900) * 10,
        // every fifth product starts sold out
        quantity: if index % 5 == 4 { 0 } else { 3 + (index as i64 * 7) % 20 },
        expiration_date: None,
    }
}

/// Inserts `count` demo products into an empty catalog.
pub async fn seed_catalog(
    state: &AppState,
    session: &Session,
    count: usize,
) -> Result<SeedSummary, ApiError> {
    session.require(Capability::ManageCatalog)?;

    let products = state.db().products();
    let existing = products.count().await?;
    if existing > 0 {
        info!(existing, "Catalog not empty, skipping seed");
        return Ok(SeedSummary { created: 0, existing });
    }

    for index in 0..count {
        products.upsert(&demo_product(index), None, None).await?;
    }

    info!(created = count, "Demo catalog seeded");
    Ok(SeedSummary { created: count, existing })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::validation::validate_product_fields;

    #[test]
    fn test_demo_products_are_valid_and_stable() {
        for index in 0..50 {
            let fields = demo_product(index);
            assert!(validate_product_fields(&fields).is_ok(), "{fields:?}");
            assert!(fields.price_cents > 0);
            assert!(fields.quantity >= 0);
            assert_eq!(fields, demo_product(index));
        }
    }

    #[test]
    fn test_some_demo_products_sold_out() {
        assert_eq!(demo_product(4).quantity, 0);
        assert!(demo_product(0).quantity > 0);
    }
}
