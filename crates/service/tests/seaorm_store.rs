use std::sync::Arc;

use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, SqlErr};
use uuid::Uuid;

use models::{bike, sale, BikeStatus};
use service::errors::ServiceError;
use service::inventory::domain::{BikePatch, NewBike};
use service::repo::seaorm::SeaOrmStore;
use service::repo::{BikeRepository, SaleRepository};
use service::sales::domain::{NewSale, SaleOutcome};

async fn setup_test_db() -> Result<Option<DatabaseConnection>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        println!("Skipping database tests (no DATABASE_URL or SKIP_DB_TESTS set)");
        return Ok(None);
    }
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}

fn new_bike(name: &str, purchase_price: f64) -> NewBike {
    NewBike {
        bike_name: name.into(),
        year: 2023,
        registration_number: format!("KA{}", &Uuid::new_v4().simple().to_string()[..6]),
        owner_phone: "9000000000".into(),
        owner_aadhar: "123412341234".into(),
        owner_address: "Bengaluru".into(),
        purchase_price,
        selling_price: purchase_price + 20000.0,
        bike_image_url: None,
        aadhar_image_url: None,
    }
}

fn new_sale(sale_price: f64) -> NewSale {
    NewSale {
        sale_price,
        customer_name: "Ravi Kumar".into(),
        customer_email: "ravi@example.com".into(),
        customer_phone: "9123456780".into(),
        customer_aadhar: "210987654321".into(),
        customer_address: "4 Residency Road, Bengaluru".into(),
    }
}

async fn sale_is_recorded_once(store: &Arc<SeaOrmStore>) -> Result<()> {
    let bike = store.create("db-test", new_bike("Pulsar 150", 150000.0)).await?;
    let SaleOutcome::Recorded(first) = store.record_sale(bike.id, "db-test", new_sale(175000.0)).await? else {
        panic!("first sale should be recorded");
    };
    assert_eq!(first.profit, 25000.0);
    assert_eq!(first.purchase_price, 150000.0);
    assert!(matches!(store.record_sale(bike.id, "db-test", new_sale(180000.0)).await?, SaleOutcome::AlreadySold));

    let stored = BikeRepository::get(store.as_ref(), bike.id).await?.expect("bike exists");
    assert_eq!(stored.status, BikeStatus::Sold);
    assert_eq!(store.find_by_bike(bike.id).await?.map(|s| s.id), Some(first.id));

    // Concurrent sellers: the row lock and conditional flip let exactly one through.
    let contested = store.create("db-test", new_bike("Splendor", 50000.0)).await?.id;
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.record_sale(contested, "db-test", new_sale(60000.0 + i as f64)).await })
        })
        .collect();
    let mut recorded = 0;
    for h in handles {
        if matches!(h.await??, SaleOutcome::Recorded(_)) {
            recorded += 1;
        }
    }
    assert_eq!(recorded, 1);

    for id in [bike.id, contested] {
        store.delete_cascade(id).await?;
    }
    Ok(())
}

async fn second_sale_row_hits_unique_index(store: &Arc<SeaOrmStore>, db: &DatabaseConnection) -> Result<()> {
    let bike = store.create("db-test", new_bike("Activa", 40000.0)).await?;
    let SaleOutcome::Recorded(first) = store.record_sale(bike.id, "db-test", new_sale(45000.0)).await? else {
        panic!("first sale should be recorded");
    };

    let mut dup = sale::ActiveModel::from(first).reset_all();
    dup.id = Set(Uuid::new_v4());
    let err = dup.insert(db).await.expect_err("sale.bike_id is unique");
    assert!(matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))));

    store.delete_cascade(bike.id).await?;
    Ok(())
}

async fn sold_price_is_frozen(store: &Arc<SeaOrmStore>) -> Result<()> {
    let bike = store.create("db-test", new_bike("Classic 350", 120000.0)).await?;
    store.record_sale(bike.id, "db-test", new_sale(140000.0)).await?;

    let change = BikePatch { purchase_price: Some(1.0), ..Default::default() };
    assert!(matches!(store.update(bike.id, change).await, Err(ServiceError::Conflict(_))));

    let rename = BikePatch { bike_name: Some("Classic 350 (resold)".into()), purchase_price: Some(120000.0), ..Default::default() };
    let updated = store.update(bike.id, rename).await?.expect("bike exists");
    assert_eq!(updated.bike_name, "Classic 350 (resold)");
    assert_eq!(updated.purchase_price, 120000.0);
    assert!(store.update(Uuid::new_v4(), BikePatch::default()).await?.is_none());

    store.delete_cascade(bike.id).await?;
    Ok(())
}

async fn delete_takes_sales_with_it(store: &Arc<SeaOrmStore>) -> Result<()> {
    let bike = store.create("db-test", new_bike("Apache", 90000.0)).await?;
    store.record_sale(bike.id, "db-test", new_sale(95000.0)).await?;

    assert_eq!(store.delete_cascade(bike.id).await?, Some(1));
    assert!(bike::Entity::find_by_id(bike.id).one(&store.db).await?.is_none());
    assert!(store.find_by_bike(bike.id).await?.is_none());
    assert_eq!(store.delete_cascade(bike.id).await?, None);
    Ok(())
}

async fn reset_reverts_every_sale(store: &Arc<SeaOrmStore>) -> Result<()> {
    let sold_a = store.create("db-test", new_bike("FZ", 70000.0)).await?;
    let sold_b = store.create("db-test", new_bike("R15", 110000.0)).await?;
    let idle = store.create("db-test", new_bike("Jupiter", 45000.0)).await?;
    for id in [sold_a.id, sold_b.id] {
        store.record_sale(id, "db-test", new_sale(120000.0)).await?;
    }

    let summary = store.reset_all().await?;
    assert!(summary.sales_deleted >= 2);
    assert!(summary.bikes_reset >= 2);
    assert!(SaleRepository::list(store.as_ref()).await?.is_empty());
    assert!(BikeRepository::list(store.as_ref(), Some(BikeStatus::Sold)).await?.is_empty());
    for id in [sold_a.id, sold_b.id, idle.id] {
        let bike = BikeRepository::get(store.as_ref(), id).await?.expect("bike survives reset");
        assert_eq!(bike.status, BikeStatus::Available);
        store.delete_cascade(id).await?;
    }
    Ok(())
}

/// Store transitions against a live database. Run as one test since the
/// reset touches every sale in the table.
#[tokio::test]
async fn test_store_transitions() -> Result<()> {
    let Some(db) = setup_test_db().await? else {
        return Ok(());
    };
    let store = Arc::new(SeaOrmStore::new(db.clone()));

    sale_is_recorded_once(&store).await?;
    second_sale_row_hits_unique_index(&store, &db).await?;
    sold_price_is_frozen(&store).await?;
    delete_takes_sales_with_it(&store).await?;
    reset_reverts_every_sale(&store).await?;
    Ok(())
}
