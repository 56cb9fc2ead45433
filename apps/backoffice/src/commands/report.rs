//! # Report Commands
//!
//! Admin dashboard figures and the joined sales listing.

use std::time::Instant;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use shelf_core::{AggregateReport, Capability, SaleReportRow, Session};

/// Stock, revenue and recent-sales summary over the whole catalog and ledger.
pub async fn get_aggregate_report(
    state: &AppState,
    session: &Session,
) -> Result<AggregateReport, ApiError> {
    session.require(Capability::ViewReports)?;
    let start = Instant::now();

    let products = state.db().products().list().await?;
    let sales = state.db().sales().list().await?;
    let report =
        AggregateReport::compute(&products, &sales, state.config().recent_sales_window)?;

    debug!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        products = products.len(),
        sales = sales.len(),
        "Aggregate report computed"
    );
    Ok(report)
}

/// Every sale with product and seller names, newest first.
pub async fn get_sales_report(
    state: &AppState,
    session: &Session,
) -> Result<Vec<SaleReportRow>, ApiError> {
    session.require(Capability::ViewReports)?;

    let rows = state.db().sales().report_rows().await?;
    Ok(rows)
}
