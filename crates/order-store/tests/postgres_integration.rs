//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p order-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::{CustomerId, OrderId, SellerId, Sku};
use domain::{Order, OrderLineItem, OrderStatus, PaymentMethod, PaymentTerms};
use order_store::{Customer, CustomerStore, OrderFilter, OrderStore, PostgresOrderStore, StoreError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_order_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_store() -> PostgresOrderStore {
    let info = get_container_info().await;
    let pool = PgPool::connect(&info.connection_string).await.unwrap();
    PostgresOrderStore::new(pool)
}

async fn seed_customer(store: &PostgresOrderStore) -> Customer {
    let customer = Customer {
        id: CustomerId::new(),
        business_name: "Clínica San Rafael".to_string(),
        address: Some("Cra 8 # 17-45".to_string()),
        city: Some("Bogotá".to_string()),
        department: Some("Cundinamarca".to_string()),
        is_active: true,
    };

    sqlx::query(
        "INSERT INTO customers (id, business_name, address, city, department, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(customer.id.as_uuid())
    .bind(&customer.business_name)
    .bind(&customer.address)
    .bind(&customer.city)
    .bind(&customer.department)
    .bind(customer.is_active)
    .execute(store.pool())
    .await
    .unwrap();

    customer
}

fn test_item(sku: &str, quantity: u32) -> OrderLineItem {
    // Whole-second timestamp: TIMESTAMPTZ drops sub-microsecond
    // precision, which would break round-trip equality checks.
    let checked_at = Utc.with_ymd_and_hms(2026, 3, 15, 10, 0, 0).unwrap();
    OrderLineItem::priced(
        Sku::new(sku),
        format!("Product {sku}"),
        quantity,
        dec!(350.00),
        dec!(5.0),
        dec!(19.0),
    )
    .unwrap()
    .with_reservation("CEDIS-BOG", true, checked_at)
}

fn test_order(customer_id: CustomerId, items: Vec<OrderLineItem>) -> Order {
    let now = Utc.with_ymd_and_hms(2026, 3, 15, 10, 30, 0).unwrap();
    let mut order = Order {
        id: OrderId::new(),
        order_number: String::new(),
        customer_id,
        seller_id: SellerId::new("VND-001"),
        seller_name: "Ana Torres".to_string(),
        order_date: now,
        status: OrderStatus::Pending,
        subtotal: Decimal::ZERO,
        discount_amount: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        total_amount: Decimal::ZERO,
        payment_terms: PaymentTerms::Credit30,
        payment_method: Some(PaymentMethod::Transfer),
        delivery_address: Some("Calle 10 # 5-51".to_string()),
        delivery_city: Some("Bogotá".to_string()),
        delivery_department: Some("Cundinamarca".to_string()),
        preferred_distribution_center: Some("CEDIS-BOG".to_string()),
        notes: Some("entregar en la mañana".to_string()),
        items,
        created_at: now,
        updated_at: now,
    };
    order.recompute_totals();
    order
}

#[tokio::test]
async fn test_create_and_get_round_trips_the_aggregate() {
    let store = get_store().await;
    let customer = seed_customer(&store).await;

    let order = test_order(
        customer.id,
        vec![test_item("JER-001", 10), test_item("GAS-002", 4)],
    );
    let created = store.create(order).await.unwrap();

    assert!(created.order_number.starts_with("ORD-20260315-"));

    let loaded = store.get(created.id).await.unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.items.len(), 2);
    assert_eq!(loaded.items[0].product_sku.as_str(), "JER-001");
    assert_eq!(loaded.items[0].total, dec!(3956.75));
}

#[tokio::test]
async fn test_order_numbers_increment_within_a_day() {
    let store = get_store().await;
    let customer = seed_customer(&store).await;

    let first = store
        .create(test_order(customer.id, vec![test_item("JER-001", 1)]))
        .await
        .unwrap();
    let second = store
        .create(test_order(customer.id, vec![test_item("JER-001", 1)]))
        .await
        .unwrap();

    let seq = |number: &str| number.rsplit('-').next().unwrap().parse::<u32>().unwrap();
    assert!(seq(&second.order_number) > seq(&first.order_number));
}

#[tokio::test]
async fn test_get_missing_order_is_none() {
    let store = get_store().await;
    assert!(store.get(OrderId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_replaces_items_wholesale() {
    let store = get_store().await;
    let customer = seed_customer(&store).await;

    let mut order = store
        .create(test_order(
            customer.id,
            vec![test_item("JER-001", 10), test_item("GAS-002", 4)],
        ))
        .await
        .unwrap();

    order.replace_items(vec![test_item("ALC-003", 2)]);
    order.notes = Some("replaced".to_string());
    store.update(&order).await.unwrap();

    let loaded = store.get(order.id).await.unwrap().unwrap();
    assert_eq!(loaded.items.len(), 1);
    assert_eq!(loaded.items[0].product_sku.as_str(), "ALC-003");
    assert_eq!(loaded.notes.as_deref(), Some("replaced"));
    assert_eq!(loaded.total_amount, loaded.items[0].total);
}

#[tokio::test]
async fn test_update_missing_order_fails() {
    let store = get_store().await;
    let customer = seed_customer(&store).await;

    let order = test_order(customer.id, vec![test_item("JER-001", 1)]);
    let err = store.update(&order).await.unwrap_err();
    assert!(matches!(err, StoreError::OrderNotFound(id) if id == order.id));
}

#[tokio::test]
async fn test_delete_cascades_to_items() {
    let store = get_store().await;
    let customer = seed_customer(&store).await;

    let order = store
        .create(test_order(customer.id, vec![test_item("JER-001", 3)]))
        .await
        .unwrap();

    store.delete(order.id).await.unwrap();

    assert!(store.get(order.id).await.unwrap().is_none());
    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = $1")
            .bind(order.id.as_uuid())
            .fetch_one(store.pool())
            .await
            .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_delete_missing_order_fails() {
    let store = get_store().await;
    let err = store.delete(OrderId::new()).await.unwrap_err();
    assert!(matches!(err, StoreError::OrderNotFound(_)));
}

#[tokio::test]
async fn test_failed_item_insert_rolls_back_the_order() {
    let store = get_store().await;
    let customer = seed_customer(&store).await;

    // Hand-build an item violating the quantity check constraint so the
    // second insert of the transaction fails.
    let mut bad_item = test_item("JER-001", 1);
    bad_item.quantity = 0;

    let order = test_order(customer.id, vec![bad_item]);
    let order_id = order.id;
    assert!(store.create(order).await.is_err());

    // Nothing from the failed create is visible.
    assert!(store.get(order_id).await.unwrap().is_none());
    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = $1")
        .bind(order_id.as_uuid())
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn test_list_filters_by_status_and_customer() {
    let store = get_store().await;
    let customer = seed_customer(&store).await;

    let pending = store
        .create(test_order(customer.id, vec![test_item("JER-001", 1)]))
        .await
        .unwrap();
    let mut confirmed = test_order(customer.id, vec![test_item("GAS-002", 1)]);
    confirmed.status = OrderStatus::Confirmed;
    store.create(confirmed).await.unwrap();

    let filter = OrderFilter {
        customer_id: Some(customer.id),
        status: Some(OrderStatus::Pending),
        ..OrderFilter::default()
    };
    let results = store.list(&filter).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, pending.id);
    assert_eq!(results[0].items.len(), 1);
}

#[tokio::test]
async fn test_customer_lookup() {
    let store = get_store().await;
    let customer = seed_customer(&store).await;

    let found = store.customer(customer.id).await.unwrap().unwrap();
    assert_eq!(found, customer);

    assert!(store.customer(CustomerId::new()).await.unwrap().is_none());
}
