//! # Reporting Aggregator
//!
//! Dashboard metrics derived from the catalog and the full ledger.
//! Pure and recomputed on every call; the shop's catalog and ledger are
//! small enough that incremental aggregation is not worth its bookkeeping.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, Sale};

/// Everything the admin dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    /// Σ quantity on hand.
    pub total_stock: i64,
    /// Σ quantity over all sales.
    pub total_sold: i64,
    /// Σ frozen sale totals.
    pub total_revenue: Money,
    /// Σ price × quantity on hand.
    pub total_stock_value: Money,
    /// Newest sales first, bounded by the requested window.
    pub recent_sales: Vec<Sale>,
}

impl AggregateReport {
    /// Computes the report over the given catalog and ledger.
    ///
    /// ## Errors
    /// `CoreError::Overflow` if any total leaves the i64 range.
    pub fn compute(products: &[Product], sales: &[Sale], recent_window: usize) -> CoreResult<Self> {
        Ok(AggregateReport {
            total_stock: total_stock(products)?,
            total_sold: total_sold(sales)?,
            total_revenue: total_revenue(sales)?,
            total_stock_value: total_stock_value(products)?,
            recent_sales: recent_sales(sales, recent_window),
        })
    }
}

fn overflow(what: &str) -> CoreError {
    CoreError::Overflow(what.to_string())
}

pub fn total_stock(products: &[Product]) -> CoreResult<i64> {
    products
        .iter()
        .try_fold(0i64, |acc, p| acc.checked_add(p.quantity))
        .ok_or_else(|| overflow("total stock"))
}

pub fn total_sold(sales: &[Sale]) -> CoreResult<i64> {
    sales
        .iter()
        .try_fold(0i64, |acc, s| acc.checked_add(s.quantity))
        .ok_or_else(|| overflow("total sold"))
}

pub fn total_revenue(sales: &[Sale]) -> CoreResult<Money> {
    sales
        .iter()
        .try_fold(Money::zero(), |acc, s| acc.checked_add(s.total_value()))
        .ok_or_else(|| overflow("total revenue"))
}

pub fn total_stock_value(products: &[Product]) -> CoreResult<Money> {
    products
        .iter()
        .try_fold(Money::zero(), |acc, p| {
            p.price()
                .checked_multiply_quantity(p.quantity)
                .and_then(|value| acc.checked_add(value))
        })
        .ok_or_else(|| overflow("stock value"))
}

/// Sales ordered by `sale_date` descending, newest first.
///
/// Sales sharing a timestamp are ordered by id descending, so the later
/// insert still wins.
pub fn recent_sales(sales: &[Sale], window: usize) -> Vec<Sale> {
    let mut ordered: Vec<Sale> = sales.to_vec();
    ordered.sort_by(|a, b| b.sale_date.cmp(&a.sale_date).then(b.id.cmp(&a.id)));
    ordered.truncate(window);
    ordered
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn product(id: i64, price_cents: i64, quantity: i64) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            brand: "Natura".to_string(),
            style: "Corpo e Banho".to_string(),
            product_type: "Hidratante".to_string(),
            price_cents,
            quantity,
            expiration_date: None,
            image: None,
        }
    }

    fn sale(id: i64, quantity: i64, total_value_cents: i64, minutes: i64) -> Sale {
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        Sale {
            id,
            product_id: 1,
            quantity,
            total_value_cents,
            sale_date: base + Duration::minutes(minutes),
            user_id: None,
        }
    }

    #[test]
    fn test_totals_over_ledger() {
        let sales = vec![sale(1, 2, 1000, 0), sale(2, 3, 3000, 1)];
        let report = AggregateReport::compute(&[], &sales, 10).unwrap();

        assert_eq!(report.total_sold, 5);
        assert_eq!(report.total_revenue, Money::from_cents(4000));
        assert_eq!(report.total_stock, 0);
        assert_eq!(report.total_stock_value, Money::zero());
    }

    #[test]
    fn test_stock_totals() {
        let products = vec![product(1, 500, 10), product(2, 999, 2)];
        let report = AggregateReport::compute(&products, &[], 10).unwrap();

        assert_eq!(report.total_stock, 12);
        assert_eq!(report.total_stock_value.cents(), 5000 + 1998);
        assert!(report.recent_sales.is_empty());
    }

    #[test]
    fn test_recent_sales_newest_first_and_bounded() {
        let sales: Vec<Sale> = (1..=15).map(|i| sale(i, 1, 100, i)).collect();
        let recent = recent_sales(&sales, 10);

        assert_eq!(recent.len(), 10);
        assert_eq!(recent.first().map(|s| s.id), Some(15));
        assert_eq!(recent.last().map(|s| s.id), Some(6));
    }

    #[test]
    fn test_recent_sales_ties_break_on_id() {
        let sales = vec![sale(1, 1, 100, 0), sale(2, 1, 100, 0)];
        let recent = recent_sales(&sales, 10);
        assert_eq!(recent[0].id, 2);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let json = serde_json::to_value(AggregateReport::compute(&[], &[], 10).unwrap()).unwrap();
        assert!(json.get("totalStockValue").is_some());
        assert!(json.get("recentSales").is_some());
    }

    #[test]
    fn test_stock_value_overflow_is_an_error() {
        let products = vec![product(1, 10_000_000_000_000_000, 1000)];
        assert_eq!(
            AggregateReport::compute(&products, &[], 10),
            Err(CoreError::Overflow("stock value".to_string()))
        );
    }

    #[test]
    fn test_revenue_overflow_is_an_error() {
        let sales = vec![sale(1, 1, i64::MAX, 0), sale(2, 1, 1, 1)];
        assert!(matches!(
            AggregateReport::compute(&[], &sales, 10),
            Err(CoreError::Overflow(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_revenue_is_sum_of_totals(
            rows in proptest::collection::vec((1i64..50, 0i64..10_000), 0..40)
        ) {
            let sales: Vec<Sale> = rows
                .iter()
                .enumerate()
                .map(|(i, (qty, total))| sale(i as i64 + 1, *qty, *total, i as i64))
                .collect();
            let report = AggregateReport::compute(&[], &sales, 10).unwrap();

            prop_assert_eq!(report.total_sold, rows.iter().map(|r| r.0).sum::<i64>());
            prop_assert_eq!(report.total_revenue.cents(), rows.iter().map(|r| r.1).sum::<i64>());
            prop_assert!(report.recent_sales.len() <= 10);
        }
    }
}
