//! # Validation Module
//!
//! Input validation for catalog edits, sales and accounts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI                                                           │
//! │  └── Form widgets (min/max, required)                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repositories / sale engine (Rust)                            │
//! │  └── THIS MODULE: required fields, positive sale quantity              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE username                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Staff may set stock to any value in range as an administrative override;
//! only the sale path decrements it. The upper bounds keep every stock value
//! and report total well inside i64 cents.

use crate::error::ValidationError;
use crate::types::{NewUser, ProductFields};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_USERNAME_LEN: usize = 64;
const MAX_QUERY_LEN: usize = 100;

/// Highest unit price accepted by the catalog: 1,000,000.00.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Highest stock level accepted by the catalog.
pub const MAX_STOCK_QUANTITY: i64 = 1_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use shelf_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Malbec Eau de Toilette").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required("name", name, MAX_NAME_LEN)
}

/// Validates the textual fields of a product before it is written.
pub fn validate_product_fields(fields: &ProductFields) -> ValidationResult<()> {
    validate_product_name(&fields.name)?;
    in_range("price_cents", fields.price_cents, MAX_PRICE_CENTS)?;
    in_range("quantity", fields.quantity, MAX_STOCK_QUANTITY)
}

/// Validates a catalog search query, returning it trimmed.
///
/// Empty is allowed and means "everything".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates the fields of a new account.
pub fn validate_new_user(user: &NewUser) -> ValidationResult<()> {
    required("username", &user.username, MAX_USERNAME_LEN)?;

    if user.password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    Ok(())
}

fn required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn in_range(field: &str, value: i64, max: i64) -> ValidationResult<()> {
    if !(0..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max,
        });
    }
    Ok(())
}

/// Validates the quantity of a sale.
///
/// ## User Workflow
/// ```text
/// Cashier enters quantity: 3
///      │
///      ▼
/// validate_sale_quantity(3) ← THIS FUNCTION
///      │
///      ├── qty <= 0? → Error: "quantity must be positive"
///      │
///      └── OK → stock check inside the sale transaction
/// ```
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;
    use crate::types::UserProfile;

    fn fields(name: &str) -> ProductFields {
        ProductFields {
            name: name.to_string(),
            brand: String::new(),
            style: String::new(),
            product_type: String::new(),
            price_cents: 500,
            quantity: 0,
            expiration_date: None,
        }
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Kaiak").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_product_fields_require_name() {
        assert!(validate_product_fields(&fields("Kaiak")).is_ok());
        assert_eq!(
            validate_product_fields(&fields(" ")),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );
    }

    #[test]
    fn test_negative_price_and_stock_rejected() {
        let mut negative_price = fields("Kaiak");
        negative_price.price_cents = -500;
        assert!(matches!(
            validate_product_fields(&negative_price),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "price_cents"
        ));

        let mut negative_stock = fields("Kaiak");
        negative_stock.quantity = -7;
        assert!(matches!(
            validate_product_fields(&negative_stock),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "quantity"
        ));
    }

    #[test]
    fn test_price_and_stock_upper_bounds() {
        let mut at_limit = fields("Kaiak");
        at_limit.price_cents = MAX_PRICE_CENTS;
        at_limit.quantity = MAX_STOCK_QUANTITY;
        assert!(validate_product_fields(&at_limit).is_ok());

        let mut huge_price = fields("Kaiak");
        huge_price.price_cents = 10_000_000_000_000_000;
        assert!(validate_product_fields(&huge_price).is_err());

        let mut huge_stock = fields("Kaiak");
        huge_stock.quantity = MAX_STOCK_QUANTITY + 1;
        assert!(validate_product_fields(&huge_stock).is_err());
    }

    #[test]
    fn test_validate_sale_quantity() {
        assert!(validate_sale_quantity(1).is_ok());
        assert!(validate_sale_quantity(10_000).is_ok());
        assert!(validate_sale_quantity(0).is_err());
        assert!(validate_sale_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  natura ").unwrap(), "natura");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_new_user() {
        let mut user = NewUser {
            username: "ana".to_string(),
            password: "s3cret".to_string(),
            role: Role::Employee,
            name: Some("Ana".to_string()),
            profile: UserProfile::default(),
        };
        assert!(validate_new_user(&user).is_ok());

        user.password.clear();
        assert!(validate_new_user(&user).is_err());

        user.password = "x".to_string();
        user.username = "  ".to_string();
        assert!(validate_new_user(&user).is_err());
    }
}
