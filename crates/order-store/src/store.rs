//! Store traits and query types.

use async_trait::async_trait;
use common::{CustomerId, OrderId, SellerId};
use domain::{Order, OrderStatus};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The slice of a customer record the order workflow needs: existence,
/// activity, and delivery defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub business_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub department: Option<String>,
    pub is_active: bool,
}

/// Optional filters for listing orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderFilter {
    pub customer_id: Option<CustomerId>,
    pub seller_id: Option<SellerId>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Returns true if an order passes every supplied filter.
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(customer_id) = self.customer_id
            && order.customer_id != customer_id
        {
            return false;
        }
        if let Some(ref seller_id) = self.seller_id
            && order.seller_id != *seller_id
        {
            return false;
        }
        if let Some(status) = self.status
            && order.status != status
        {
            return false;
        }
        true
    }
}

/// Durable storage of order aggregates.
///
/// All multi-row writes (order + items) happen inside one transaction;
/// any failure during item insertion rolls back the order too.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order with its items, assigning the next
    /// `ORD-YYYYMMDD-NNNN` number for the order date. Returns the order
    /// as persisted.
    async fn create(&self, order: Order) -> Result<Order>;

    /// Loads an order with its items.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Lists orders matching the filter, newest first.
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>>;

    /// Rewrites an order and replaces its items in one transaction.
    ///
    /// Fails with [`crate::StoreError::OrderNotFound`] if the order does
    /// not exist.
    async fn update(&self, order: &Order) -> Result<()>;

    /// Deletes an order; line items are removed with it.
    ///
    /// Fails with [`crate::StoreError::OrderNotFound`] if the order does
    /// not exist.
    async fn delete(&self, id: OrderId) -> Result<()>;
}

/// Customer lookup for order validation and delivery defaults.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn customer(&self, id: CustomerId) -> Result<Option<Customer>>;
}
