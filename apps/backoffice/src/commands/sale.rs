//! # Sale Commands
//!
//! The point-of-sale entry. Business outcomes of a sale attempt come back
//! as a [`SaleResponse`], never as an `Err`; `Err` is kept for callers who
//! may not sell at all.
//!
//! ```text
//! register_sale(product 1, qty 3)
//!       │
//!       ├── session lacks RegisterSale ──────────► Err(ApiError FORBIDDEN)
//!       │
//!       └── SaleEngine::register_sale
//!               ├── Ok(sale) ────────────────────► { success: true,  sale }
//!               └── Err(SaleError) ──────────────► { success: false, reason }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;
use shelf_core::{Capability, Sale, Session};
use shelf_db::SaleError;

/// Result of a sale attempt.
///
/// ```json
/// { "success": false, "message": "Only 2 left in stock", "reason": "INSUFFICIENT_STOCK" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale: Option<Sale>,
    /// Machine-readable failure code; absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SaleResponse {
    fn completed(sale: Sale) -> Self {
        SaleResponse {
            success: true,
            message: format!("Sale registered: {} for {}", sale.quantity, sale.total_value()),
            sale: Some(sale),
            reason: None,
        }
    }

    fn rejected(err: &SaleError) -> Self {
        let message = match err {
            SaleError::NotFound { .. } => "Product not found".to_string(),
            SaleError::InsufficientStock { available, .. } => {
                format!("Insufficient stock: only {} left", available)
            }
            SaleError::InvalidQuantity { .. } => "Quantity must be a positive number".to_string(),
            SaleError::TotalOverflow { .. } => {
                "Sale total is too large, use a smaller quantity".to_string()
            }
            SaleError::TransientFailure { .. } => {
                "The store is busy right now, please try the sale again".to_string()
            }
            SaleError::Storage(_) => "The sale could not be registered".to_string(),
        };

        SaleResponse {
            success: false,
            message,
            sale: None,
            reason: Some(err.code().to_string()),
        }
    }
}

/// Sells `quantity` units of a product on behalf of the session's user.
pub async fn register_sale(
    state: &AppState,
    session: &Session,
    product_id: i64,
    quantity: i64,
) -> Result<SaleResponse, ApiError> {
    session.require(Capability::RegisterSale)?;

    match state
        .sale_engine()
        .register_sale(product_id, quantity, Some(session.actor_id()))
        .await
    {
        Ok(sale) => {
            debug!(sale_id = sale.id, user = %session.username, "Sale completed");
            Ok(SaleResponse::completed(sale))
        }
        Err(e) => {
            warn!(product_id, quantity, user = %session.username, error = %e, "Sale rejected");
            Ok(SaleResponse::rejected(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_db::DbError;

    #[test]
    fn test_rejected_carries_code() {
        let response = SaleResponse::rejected(&SaleError::InsufficientStock {
            product_id: 1,
            available: 2,
            requested: 3,
        });
        assert!(!response.success);
        assert_eq!(response.reason.as_deref(), Some("INSUFFICIENT_STOCK"));
        assert!(response.message.contains('2'));
    }

    #[test]
    fn test_total_overflow_has_its_own_reason() {
        let response = SaleResponse::rejected(&SaleError::TotalOverflow {
            product_id: 1,
            requested: 3,
        });
        assert_eq!(response.reason.as_deref(), Some("TOTAL_OVERFLOW"));
        assert!(!response.message.contains("positive"));
    }

    #[test]
    fn test_storage_message_hides_details() {
        let response =
            SaleResponse::rejected(&SaleError::Storage(DbError::QueryFailed("disk I/O".into())));
        assert!(!response.message.contains("disk"));
        assert_eq!(response.reason.as_deref(), Some("STORAGE"));
    }
}
