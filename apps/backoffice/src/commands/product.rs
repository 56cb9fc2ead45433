//! # Product Commands
//!
//! Catalog browse, search and maintenance.
//!
//! ## Who Can Do What
//! ```text
//! ┌──────────────────────────────┬─────────────────┐
//! │ list / get / search          │ BrowseCatalog   │  every role
//! │ list_products_in_stock       │ RegisterSale    │  point-of-sale picker
//! │ upsert / update / delete     │ ManageCatalog   │  admin, employee
//! └──────────────────────────────┴─────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;
use shelf_core::catalog::{is_suggested, BRANDS, STYLES, TYPES};
use shelf_core::{Capability, Product, ProductFields, Session};

/// Product DTO (Data Transfer Object) for listings.
///
/// Same as [`Product`] minus the image bytes, plus a display price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub style: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub price_cents: i64,
    /// "15.00"
    pub price: String,
    pub quantity: i64,
    pub expiration_date: Option<String>,
    pub has_image: bool,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            price: p.price().to_string(),
            has_image: p.image.is_some(),
            id: p.id,
            name: p.name,
            brand: p.brand,
            style: p.style,
            product_type: p.product_type,
            price_cents: p.price_cents,
            quantity: p.quantity,
            expiration_date: p.expiration_date,
        }
    }
}

/// Input for [`upsert_product`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    /// Replace this id instead of creating a new product.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub fields: ProductFields,
    #[serde(default)]
    pub image: Option<Vec<u8>>,
}

/// Every product, ascending id.
pub async fn list_products(state: &AppState, session: &Session) -> Result<Vec<ProductDto>, ApiError> {
    session.require(Capability::BrowseCatalog)?;

    let products = state.db().products().list().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// Products that can be sold right now.
pub async fn list_products_in_stock(
    state: &AppState,
    session: &Session,
) -> Result<Vec<ProductDto>, ApiError> {
    session.require(Capability::RegisterSale)?;

    let products = state.db().products().list_in_stock().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// One product, image included.
pub async fn get_product(state: &AppState, session: &Session, id: i64) -> Result<Product, ApiError> {
    session.require(Capability::BrowseCatalog)?;
    debug!(id, "get_product command");

    state
        .db()
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// Case-insensitive search on name and brand. Empty query lists everything.
pub async fn search_products(
    state: &AppState,
    session: &Session,
    query: &str,
) -> Result<Vec<ProductDto>, ApiError> {
    session.require(Capability::BrowseCatalog)?;
    let start = Instant::now();

    let products = state.db().products().search(query).await?;
    let dtos: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();

    debug!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = dtos.len(),
        query = %query,
        "search_products complete"
    );
    Ok(dtos)
}

/// Creates a product, or replaces the product with `input.id` wholesale.
pub async fn upsert_product(
    state: &AppState,
    session: &Session,
    input: ProductInput,
) -> Result<Product, ApiError> {
    session.require(Capability::ManageCatalog)?;
    note_unlisted(&input.fields);

    let product = state
        .db()
        .products()
        .upsert(&input.fields, input.image.as_deref(), input.id)
        .await?;

    info!(id = product.id, user_id = session.user_id, "Product saved");
    Ok(product)
}

/// Edits a product; `image = None` keeps the stored image.
pub async fn update_product(
    state: &AppState,
    session: &Session,
    id: i64,
    fields: ProductFields,
    image: Option<Vec<u8>>,
) -> Result<Product, ApiError> {
    session.require(Capability::ManageCatalog)?;
    note_unlisted(&fields);

    let product = state
        .db()
        .products()
        .update(id, &fields, image.as_deref())
        .await?;

    info!(id, user_id = session.user_id, "Product updated");
    Ok(product)
}

/// Removes a product. Missing ids succeed silently; past sales stay.
///
/// ## Returns
/// Whether a product was removed.
pub async fn delete_product(state: &AppState, session: &Session, id: i64) -> Result<bool, ApiError> {
    session.require(Capability::ManageCatalog)?;

    let removed = state.db().products().delete(id).await?;
    if removed {
        info!(id, user_id = session.user_id, "Product deleted");
    }
    Ok(removed)
}

/// Free text is accepted; values outside the suggested lists are only logged.
fn note_unlisted(fields: &ProductFields) {
    for (field, list, value) in [
        ("brand", BRANDS, &fields.brand),
        ("style", STYLES, &fields.style),
        ("type", TYPES, &fields.product_type),
    ] {
        if !value.is_empty() && !is_suggested(list, value) {
            debug!(field, value = %value, "Value outside suggested list");
        }
    }
}
