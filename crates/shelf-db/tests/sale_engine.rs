//! End-to-end behaviour of the sale engine against real SQLite files.

use std::time::Duration;

use shelf_core::{AggregateReport, ProductFields};
use shelf_db::{Database, DbConfig, SaleEngineConfig, SaleError};
use tempfile::TempDir;

fn fields(name: &str, price_cents: i64, quantity: i64) -> ProductFields {
    ProductFields {
        name: name.to_string(),
        brand: "O Boticário".to_string(),
        style: "Perfumaria".to_string(),
        product_type: "Colônia".to_string(),
        price_cents,
        quantity,
        expiration_date: None,
    }
}

async fn file_db(dir: &TempDir) -> Database {
    let config = DbConfig::new(dir.path().join("shelf.db")).max_connections(8);
    Database::new(config).await.unwrap()
}

async fn stock_of(db: &Database, id: i64) -> i64 {
    db.products().get_by_id(id).await.unwrap().unwrap().quantity
}

#[tokio::test]
async fn sale_prices_at_current_price_and_decrements() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    let p = db.products().upsert(&fields("Malbec", 500, 10), None, None).await.unwrap();

    let sale = db
        .sale_engine(SaleEngineConfig::default())
        .register_sale(p.id, 3, None)
        .await
        .unwrap();

    assert_eq!(sale.total_value().to_string(), "15.00");
    assert_eq!(stock_of(&db, p.id).await, 7);
    assert_eq!(db.sales().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn rejected_sale_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    let p = db.products().upsert(&fields("Lily", 999, 2), None, None).await.unwrap();

    let err = db
        .sale_engine(SaleEngineConfig::default())
        .register_sale(p.id, 5, None)
        .await
        .unwrap_err();

    assert!(matches!(err, SaleError::InsufficientStock { available: 2, requested: 5, .. }));
    assert_eq!(stock_of(&db, p.id).await, 2);
    assert_eq!(db.sales().count().await.unwrap(), 0);
}

#[tokio::test]
async fn later_price_change_does_not_touch_recorded_totals() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    let p = db.products().upsert(&fields("Egeo", 1000, 10), None, None).await.unwrap();
    let engine = db.sale_engine(SaleEngineConfig::default());

    let first = engine.register_sale(p.id, 2, None).await.unwrap();
    db.products()
        .update(p.id, &fields("Egeo", 4000, 8), None)
        .await
        .unwrap();
    let second = engine.register_sale(p.id, 1, None).await.unwrap();

    let stored = db.sales().get_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(stored.total_value_cents, 2000);
    assert_eq!(second.total_value_cents, 4000);

    let products = db.products().list().await.unwrap();
    let sales = db.sales().list().await.unwrap();
    let report = AggregateReport::compute(&products, &sales, 10).unwrap();
    assert_eq!(report.total_revenue.cents(), 6000);
    assert_eq!(report.total_sold, 3);
    assert_eq!(report.recent_sales[0].id, second.id);
}

#[tokio::test]
async fn failed_ledger_insert_rolls_back_stock() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    let p = db.products().upsert(&fields("Kaiak", 500, 10), None, None).await.unwrap();

    sqlx::query(
        r#"
        CREATE TRIGGER reject_sales BEFORE INSERT ON sales
        BEGIN
            SELECT RAISE(ABORT, 'ledger offline');
        END
        "#,
    )
    .execute(db.pool())
    .await
    .unwrap();

    let err = db
        .sale_engine(SaleEngineConfig::default())
        .register_sale(p.id, 3, None)
        .await
        .unwrap_err();

    assert!(matches!(err, SaleError::Storage(_)));
    assert_eq!(stock_of(&db, p.id).await, 10);
    assert_eq!(db.sales().count().await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sales_never_oversell() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    let id = db.products().upsert(&fields("Floratta", 700, 5), None, None).await.unwrap().id;
    let engine = db.sale_engine(SaleEngineConfig::default());

    let a = tokio::spawn({
        let engine = engine.clone();
        async move { engine.register_sale(id, 3, Some(1)).await }
    });
    let b = tokio::spawn({
        let engine = engine.clone();
        async move { engine.register_sale(id, 3, Some(2)).await }
    });

    let results = [a.await.unwrap(), b.await.unwrap()];
    let ok = results.iter().filter(|r| r.is_ok()).count();
    let short = results
        .iter()
        .filter(|r| matches!(r, Err(SaleError::InsufficientStock { available: 2, .. })))
        .count();

    assert_eq!(ok, 1);
    assert_eq!(short, 1);
    assert_eq!(stock_of(&db, id).await, 2);
    assert_eq!(db.sales().count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stock_is_conserved_under_load() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    let id = db.products().upsert(&fields("Arbo", 350, 20), None, None).await.unwrap().id;
    let engine = db.sale_engine(SaleEngineConfig::default());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.register_sale(id, 3, Some(i)).await })
        })
        .collect();

    let mut sold = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(sale) => sold += sale.quantity,
            Err(SaleError::InsufficientStock { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let remaining = stock_of(&db, id).await;
    let ledger: i64 = db.sales().list().await.unwrap().iter().map(|s| s.quantity).sum();

    assert_eq!(sold, 18);
    assert_eq!(remaining, 2);
    assert_eq!(remaining + ledger, 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn busy_store_reports_transient_failure_then_recovers() {
    let dir = TempDir::new().unwrap();
    let config = DbConfig::new(dir.path().join("shelf.db"))
        .max_connections(4)
        .busy_timeout(Duration::from_millis(50));
    let db = Database::new(config).await.unwrap();
    let p = db.products().upsert(&fields("Quasar", 600, 5), None, None).await.unwrap();
    let engine = db.sale_engine(SaleEngineConfig {
        max_attempts: 2,
        retry_backoff: Duration::from_millis(10),
    });

    // Another writer holds the lock for the whole first attempt series.
    let mut blocker = db.pool().begin().await.unwrap();
    sqlx::query("UPDATE products SET quantity = quantity WHERE id = ?1")
        .bind(p.id)
        .execute(&mut *blocker)
        .await
        .unwrap();

    let err = engine.register_sale(p.id, 1, None).await.unwrap_err();
    assert!(matches!(err, SaleError::TransientFailure { attempts: 2, .. }));
    assert_eq!(err.code(), "TRANSIENT_FAILURE");

    blocker.rollback().await.unwrap();

    engine.register_sale(p.id, 1, None).await.unwrap();
    assert_eq!(stock_of(&db, p.id).await, 4);
}

#[tokio::test]
async fn deleting_a_product_keeps_its_sales() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;
    let p = db.products().upsert(&fields("Glamour", 800, 4), None, None).await.unwrap();

    db.sale_engine(SaleEngineConfig::default())
        .register_sale(p.id, 2, None)
        .await
        .unwrap();
    db.products().delete(p.id).await.unwrap();

    let sales = db.sales().list_for_product(p.id).await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].total_value_cents, 1600);

    let rows = db.sales().report_rows().await.unwrap();
    assert_eq!(rows[0].product_name, None);

    let err = db
        .sale_engine(SaleEngineConfig::default())
        .register_sale(p.id, 1, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SaleError::NotFound { .. }));
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let id = {
        let db = file_db(&dir).await;
        let p = db.products().upsert(&fields("Zaad", 1200, 3), None, None).await.unwrap();
        db.sale_engine(SaleEngineConfig::default())
            .register_sale(p.id, 1, None)
            .await
            .unwrap();
        db.close().await;
        p.id
    };

    let db = file_db(&dir).await;
    assert_eq!(stock_of(&db, id).await, 2);
    assert_eq!(db.sales().count().await.unwrap(), 1);
}
