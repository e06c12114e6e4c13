use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{CustomerId, OrderId};
use domain::Order;
use uuid::Uuid;

use crate::{Customer, CustomerStore, OrderFilter, OrderStore, Result, StoreError};

#[derive(Debug, Default)]
struct InMemoryState {
    orders: HashMap<Uuid, Order>,
    customers: HashMap<Uuid, Customer>,
}

/// In-memory order store for testing.
///
/// Mirrors the PostgreSQL store's contract, including order-number
/// sequencing, so workflow and API tests run without a database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryOrderStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a customer record.
    pub fn insert_customer(&self, customer: Customer) {
        self.state
            .write()
            .unwrap()
            .customers
            .insert(customer.id.as_uuid(), customer);
    }

    /// Returns the number of stored orders.
    pub fn order_count(&self) -> usize {
        self.state.read().unwrap().orders.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, mut order: Order) -> Result<Order> {
        let mut state = self.state.write().unwrap();

        let date_key = order.order_date.format("%Y%m%d").to_string();
        let prefix = format!("ORD-{date_key}-");
        let sequence = state
            .orders
            .values()
            .filter(|o| o.order_number.starts_with(&prefix))
            .count()
            + 1;
        order.order_number = format!("{prefix}{sequence:04}");

        state.orders.insert(order.id.as_uuid(), order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.state.read().unwrap().orders.get(&id.as_uuid()).cloned())
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let state = self.state.read().unwrap();
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|order| filter.matches(order))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    async fn update(&self, order: &Order) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if !state.orders.contains_key(&order.id.as_uuid()) {
            return Err(StoreError::OrderNotFound(order.id));
        }

        state.orders.insert(order.id.as_uuid(), order.clone());
        Ok(())
    }

    async fn delete(&self, id: OrderId) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if state.orders.remove(&id.as_uuid()).is_none() {
            return Err(StoreError::OrderNotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerStore for InMemoryOrderStore {
    async fn customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        Ok(self
            .state
            .read()
            .unwrap()
            .customers
            .get(&id.as_uuid())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::{SellerId, Sku};
    use domain::{OrderLineItem, OrderStatus, PaymentTerms};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn test_order(date: chrono::DateTime<Utc>) -> Order {
        let mut order = Order {
            id: OrderId::new(),
            order_number: String::new(),
            customer_id: CustomerId::new(),
            seller_id: SellerId::new("VND-001"),
            seller_name: "Ana Torres".to_string(),
            order_date: date,
            status: OrderStatus::Pending,
            subtotal: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            payment_terms: PaymentTerms::Cash,
            payment_method: None,
            delivery_address: None,
            delivery_city: None,
            delivery_department: None,
            preferred_distribution_center: None,
            notes: None,
            items: vec![
                OrderLineItem::priced(
                    Sku::new("JER-001"),
                    "Syringe pack",
                    2,
                    dec!(10.00),
                    Decimal::ZERO,
                    dec!(19),
                )
                .unwrap(),
            ],
            created_at: date,
            updated_at: date,
        };
        order.recompute_totals();
        order
    }

    fn fixed_date() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 10, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_daily_sequence_numbers() {
        let store = InMemoryOrderStore::new();

        let first = store.create(test_order(fixed_date())).await.unwrap();
        let second = store.create(test_order(fixed_date())).await.unwrap();

        assert_eq!(first.order_number, "ORD-20260315-0001");
        assert_eq!(second.order_number, "ORD-20260315-0002");
    }

    #[tokio::test]
    async fn sequence_restarts_per_day() {
        let store = InMemoryOrderStore::new();
        store.create(test_order(fixed_date())).await.unwrap();

        let other_day = Utc.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap();
        let order = store.create(test_order(other_day)).await.unwrap();
        assert_eq!(order.order_number, "ORD-20260316-0001");
    }

    #[tokio::test]
    async fn get_round_trips_the_aggregate() {
        let store = InMemoryOrderStore::new();
        let created = store.create(test_order(fixed_date())).await.unwrap();

        let loaded = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn get_missing_order_is_none() {
        let store = InMemoryOrderStore::new();
        assert!(store.get(OrderId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let store = InMemoryOrderStore::new();
        let created = store.create(test_order(fixed_date())).await.unwrap();

        let mut confirmed = test_order(fixed_date());
        confirmed.status = OrderStatus::Confirmed;
        store.create(confirmed).await.unwrap();

        let filter = OrderFilter {
            status: Some(OrderStatus::Pending),
            ..OrderFilter::default()
        };
        let pending = store.list(&filter).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, created.id);
    }

    #[tokio::test]
    async fn list_filters_by_customer_and_seller() {
        let store = InMemoryOrderStore::new();
        let order = store.create(test_order(fixed_date())).await.unwrap();
        store.create(test_order(fixed_date())).await.unwrap();

        let by_customer = store
            .list(&OrderFilter {
                customer_id: Some(order.customer_id),
                ..OrderFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_customer.len(), 1);

        let by_seller = store
            .list(&OrderFilter {
                seller_id: Some(SellerId::new("VND-999")),
                ..OrderFilter::default()
            })
            .await
            .unwrap();
        assert!(by_seller.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_the_aggregate() {
        let store = InMemoryOrderStore::new();
        let mut order = store.create(test_order(fixed_date())).await.unwrap();

        order.notes = Some("updated".to_string());
        store.update(&order).await.unwrap();

        let loaded = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.notes.as_deref(), Some("updated"));
    }

    #[tokio::test]
    async fn update_missing_order_fails() {
        let store = InMemoryOrderStore::new();
        let order = test_order(fixed_date());

        let err = store.update(&order).await.unwrap_err();
        assert!(matches!(err, StoreError::OrderNotFound(id) if id == order.id));
    }

    #[tokio::test]
    async fn delete_removes_order_and_items() {
        let store = InMemoryOrderStore::new();
        let order = store.create(test_order(fixed_date())).await.unwrap();

        store.delete(order.id).await.unwrap();
        assert!(store.get(order.id).await.unwrap().is_none());
        assert_eq!(store.order_count(), 0);
    }

    #[tokio::test]
    async fn delete_missing_order_fails() {
        let store = InMemoryOrderStore::new();
        let err = store.delete(OrderId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::OrderNotFound(_)));
    }

    #[tokio::test]
    async fn customer_lookup() {
        let store = InMemoryOrderStore::new();
        let customer = Customer {
            id: CustomerId::new(),
            business_name: "Clínica San Rafael".to_string(),
            address: Some("Cra 8 # 17-45".to_string()),
            city: Some("Bogotá".to_string()),
            department: Some("Cundinamarca".to_string()),
            is_active: true,
        };
        store.insert_customer(customer.clone());

        let found = store.customer(customer.id).await.unwrap().unwrap();
        assert_eq!(found, customer);
        assert!(store.customer(CustomerId::new()).await.unwrap().is_none());
    }
}
