//! Order creation and update over the collaborator services.

use chrono::Utc;
use common::OrderId;
use domain::{
    DEFAULT_TAX_PERCENTAGE, LineItemInput, Order, OrderLineItem, OrderPatch, OrderStatus,
};
use futures_util::future::try_join_all;
use integrations::{ProductCatalog, StockInventory};
use order_store::{CustomerStore, OrderFilter, OrderStore};
use rust_decimal::Decimal;

use crate::error::WorkflowError;
use crate::request::CreateOrderRequest;
use crate::validate::{self, ValidationError};

/// Coordinates order creation and edits.
///
/// Creation is all-or-nothing: every line item must resolve against the
/// catalog and reserve stock before anything is persisted, and the
/// persist itself is a single transaction. Remote lookups run
/// concurrently across items; within one item the product lookup gates
/// the stock check so a missing or inactive product never consumes a
/// reservation. The first failed item aborts the whole call and drops
/// the remaining in-flight lookups.
pub struct OrderWorkflow<S, C, I>
where
    S: OrderStore + CustomerStore,
    C: ProductCatalog,
    I: StockInventory,
{
    store: S,
    catalog: C,
    inventory: I,
}

impl<S, C, I> OrderWorkflow<S, C, I>
where
    S: OrderStore + CustomerStore,
    C: ProductCatalog,
    I: StockInventory,
{
    /// Creates a new workflow over the given store and collaborators.
    pub fn new(store: S, catalog: C, inventory: I) -> Self {
        Self {
            store,
            catalog,
            inventory,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Builds, prices, and persists a new order.
    #[tracing::instrument(skip(self, request), fields(item_count = request.items.len()))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, WorkflowError> {
        metrics::counter!("orders_create_attempts_total").increment(1);
        let started = std::time::Instant::now();

        validate::validate(&request)?;
        let customer_id = request
            .customer_id
            .ok_or(ValidationError::MissingCustomerId)?;
        let seller_id = request
            .seller_id
            .clone()
            .ok_or(ValidationError::MissingSellerId)?;

        let customer = self
            .store
            .customer(customer_id)
            .await?
            .ok_or(WorkflowError::CustomerNotFound(customer_id))?;
        if !customer.is_active {
            return Err(WorkflowError::CustomerInactive(customer.business_name));
        }

        let preferred = request.preferred_distribution_center.as_deref();
        let items = try_join_all(
            request
                .items
                .iter()
                .map(|input| self.resolve_item(input, preferred)),
        )
        .await?;

        let now = Utc::now();
        let mut order = Order {
            id: OrderId::new(),
            // Assigned by the store inside the create transaction.
            order_number: String::new(),
            customer_id,
            seller_id,
            seller_name: request.seller_name.clone().unwrap_or_default(),
            order_date: now,
            status: OrderStatus::Pending,
            subtotal: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            payment_terms: request.payment_terms.unwrap_or_default(),
            payment_method: request.payment_method,
            delivery_address: request.delivery_address.clone().or(customer.address),
            delivery_city: request.delivery_city.clone().or(customer.city),
            delivery_department: request.delivery_department.clone().or(customer.department),
            preferred_distribution_center: request.preferred_distribution_center.clone(),
            notes: request.notes.clone(),
            items,
            created_at: now,
            updated_at: now,
        };
        order.recompute_totals();

        let order = self.store.create(order).await?;

        metrics::counter!("orders_created_total").increment(1);
        metrics::histogram!("order_create_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        tracing::info!(order_number = %order.order_number, total = %order.total_amount, "order created");

        Ok(order)
    }

    /// Applies a patch to a pending order.
    ///
    /// Status changes go through the transition table; a supplied item
    /// list replaces the existing one wholesale and is re-resolved
    /// against the collaborators before totals are recomputed.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_order(
        &self,
        id: OrderId,
        patch: OrderPatch,
    ) -> Result<Order, WorkflowError> {
        let mut order = self
            .store
            .get(id)
            .await?
            .ok_or(WorkflowError::OrderNotFound(id))?;

        order.ensure_editable()?;

        // Validate the replacement items before touching anything.
        if let Some(ref items) = patch.items {
            validate::validate_items(items)?;
        }

        if let Some(next) = patch.status {
            order.transition_status(next)?;
        }
        patch.apply_scalars(&mut order);

        if let Some(ref inputs) = patch.items {
            let preferred = order.preferred_distribution_center.as_deref();
            let items = try_join_all(
                inputs
                    .iter()
                    .map(|input| self.resolve_item(input, preferred)),
            )
            .await?;
            order.replace_items(items);
        }

        order.updated_at = Utc::now();
        self.store.update(&order).await?;

        metrics::counter!("orders_updated_total").increment(1);
        tracing::info!(order_number = %order.order_number, status = %order.status, "order updated");

        Ok(order)
    }

    /// Loads an order by id.
    pub async fn get_order(&self, id: OrderId) -> Result<Order, WorkflowError> {
        self.store
            .get(id)
            .await?
            .ok_or(WorkflowError::OrderNotFound(id))
    }

    /// Lists orders matching the filter.
    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, WorkflowError> {
        Ok(self.store.list(filter).await?)
    }

    /// Deletes an order and its items.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), WorkflowError> {
        self.store.delete(id).await?;
        Ok(())
    }

    /// Resolves one line item: price and activity from the catalog
    /// first, then a stock reservation. The order matters — pricing
    /// failures must not consume a stock check.
    async fn resolve_item(
        &self,
        input: &LineItemInput,
        preferred_center: Option<&str>,
    ) -> Result<OrderLineItem, WorkflowError> {
        let product = self.catalog.product_by_sku(&input.product_sku).await?;
        if !product.is_active {
            return Err(WorkflowError::InactiveProduct {
                sku: input.product_sku.clone(),
            });
        }

        let reservation = self
            .inventory
            .reserve(&input.product_sku, input.quantity, preferred_center)
            .await?;

        let item = OrderLineItem::priced(
            input.product_sku.clone(),
            product.name,
            input.quantity,
            product.unit_price,
            input.discount_percentage.unwrap_or(Decimal::ZERO),
            input.tax_percentage.unwrap_or(DEFAULT_TAX_PERCENTAGE),
        )?
        .with_reservation(
            reservation.distribution_center_code,
            reservation.confirmed,
            Utc::now(),
        );

        Ok(item)
    }
}
