//! # Sale Planning
//!
//! The decision half of a sale: given the product state read inside the
//! transaction, decide whether the sale may happen and what it costs.
//! `shelf-db` performs the writes this module plans.
//!
//! ## Snapshot Pricing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  read (price=5.00, on_hand=10)  ──►  plan_sale(qty=3)                  │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                         SalePlan { total: 15.00, remaining: 7 }        │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                   total is written to the ledger as-is and             │
//! │                   never recomputed from the catalog again              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::validate_sale_quantity;

/// Product state as read at the start of a sale transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockSnapshot {
    pub product_id: i64,
    pub unit_price: Money,
    pub on_hand: i64,
}

/// An approved sale, ready to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalePlan {
    pub product_id: i64,
    pub quantity: i64,
    /// Price used for the total; the one read in the snapshot.
    pub unit_price: Money,
    pub total: Money,
    /// Quantity on hand after the sale.
    pub remaining: i64,
}

/// Checks a requested quantity against a snapshot and prices it.
///
/// ## Errors
/// - `Validation(MustBePositive)` when `quantity <= 0`
/// - `InsufficientStock` when `on_hand < quantity`
/// - `Overflow` when the total does not fit in i64 cents
pub fn plan_sale(snapshot: &StockSnapshot, quantity: i64) -> CoreResult<SalePlan> {
    validate_sale_quantity(quantity)?;

    if snapshot.on_hand < quantity {
        return Err(CoreError::InsufficientStock {
            product_id: snapshot.product_id,
            available: snapshot.on_hand,
            requested: quantity,
        });
    }

    let total = snapshot
        .unit_price
        .checked_multiply_quantity(quantity)
        .ok_or_else(|| CoreError::Overflow("sale total".to_string()))?;

    Ok(SalePlan {
        product_id: snapshot.product_id,
        quantity,
        unit_price: snapshot.unit_price,
        total,
        remaining: snapshot.on_hand - quantity,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use proptest::prelude::*;

    fn snapshot(price_cents: i64, on_hand: i64) -> StockSnapshot {
        StockSnapshot {
            product_id: 1,
            unit_price: Money::from_cents(price_cents),
            on_hand,
        }
    }

    #[test]
    fn test_plan_prices_at_snapshot() {
        let plan = plan_sale(&snapshot(500, 10), 3).unwrap();
        assert_eq!(plan.total.cents(), 1500);
        assert_eq!(plan.unit_price.cents(), 500);
        assert_eq!(plan.remaining, 7);
    }

    #[test]
    fn test_selling_everything_leaves_zero() {
        let plan = plan_sale(&snapshot(999, 2), 2).unwrap();
        assert_eq!(plan.remaining, 0);
        assert_eq!(plan.total.cents(), 1998);
    }

    #[test]
    fn test_insufficient_stock() {
        let err = plan_sale(&snapshot(999, 2), 5).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product_id: 1,
                available: 2,
                requested: 5
            }
        );
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        assert!(matches!(
            plan_sale(&snapshot(100, 10), 0),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(plan_sale(&snapshot(100, 10), -1).is_err());
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        assert!(matches!(
            plan_sale(&snapshot(i64::MAX, i64::MAX), 2),
            Err(CoreError::Overflow(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_plan_never_goes_negative(
            price in 0i64..100_000,
            on_hand in 0i64..1_000,
            quantity in 1i64..1_000,
        ) {
            match plan_sale(&snapshot(price, on_hand), quantity) {
                Ok(plan) => {
                    prop_assert!(plan.remaining >= 0);
                    prop_assert_eq!(plan.remaining + plan.quantity, on_hand);
                    prop_assert_eq!(plan.total.cents(), price * quantity);
                }
                Err(CoreError::InsufficientStock { available, requested, .. }) => {
                    prop_assert!(available < requested);
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }
    }
}
