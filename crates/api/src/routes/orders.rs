//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::OrderId;
use domain::{Order, OrderLineItem, OrderPatch};
use integrations::{ProductCatalog, StockInventory};
use order_store::{CustomerStore, OrderFilter, OrderStore};
use ordering::{CreateOrderRequest, OrderWorkflow};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S, C, I>
where
    S: OrderStore + CustomerStore,
    C: ProductCatalog,
    I: StockInventory,
{
    pub workflow: OrderWorkflow<S, C, I>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub id: String,
    pub product_sku: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub discount_percentage: Decimal,
    pub discount_amount: Decimal,
    pub tax_percentage: Decimal,
    pub tax_amount: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub distribution_center_code: Option<String>,
    pub stock_confirmed: bool,
    pub stock_confirmation_date: Option<DateTime<Utc>>,
}

impl From<&OrderLineItem> for OrderItemResponse {
    fn from(item: &OrderLineItem) -> Self {
        Self {
            id: item.id.to_string(),
            product_sku: item.product_sku.as_str().to_string(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount_percentage: item.discount_percentage,
            discount_amount: item.discount_amount,
            tax_percentage: item.tax_percentage,
            tax_amount: item.tax_amount,
            subtotal: item.subtotal,
            total: item.total,
            distribution_center_code: item.distribution_center_code.clone(),
            stock_confirmed: item.stock_confirmed,
            stock_confirmation_date: item.stock_confirmation_date,
        }
    }
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub order_number: String,
    pub customer_id: String,
    pub seller_id: String,
    pub seller_name: String,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub payment_terms: String,
    pub payment_method: Option<String>,
    pub delivery_address: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_department: Option<String>,
    pub preferred_distribution_center: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            order_number: order.order_number.clone(),
            customer_id: order.customer_id.to_string(),
            seller_id: order.seller_id.as_str().to_string(),
            seller_name: order.seller_name.clone(),
            order_date: order.order_date,
            status: order.status.as_str().to_string(),
            subtotal: order.subtotal,
            discount_amount: order.discount_amount,
            tax_amount: order.tax_amount,
            total_amount: order.total_amount,
            payment_terms: order.payment_terms.as_str().to_string(),
            payment_method: order.payment_method.map(|m| m.as_str().to_string()),
            delivery_address: order.delivery_address.clone(),
            delivery_city: order.delivery_city.clone(),
            delivery_department: order.delivery_department.clone(),
            preferred_distribution_center: order.preferred_distribution_center.clone(),
            notes: order.notes.clone(),
            items: order.items.iter().map(OrderItemResponse::from).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

// -- Handlers --

/// POST /orders — create a new order.
#[tracing::instrument(skip(state, request))]
pub async fn create<S, C, I>(
    State(state): State<Arc<AppState<S, C, I>>>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError>
where
    S: OrderStore + CustomerStore + 'static,
    C: ProductCatalog + 'static,
    I: StockInventory + 'static,
{
    let order = state.workflow.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// GET /orders/{id} — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S, C, I>(
    State(state): State<Arc<AppState<S, C, I>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError>
where
    S: OrderStore + CustomerStore + 'static,
    C: ProductCatalog + 'static,
    I: StockInventory + 'static,
{
    let order_id = parse_order_id(&id)?;
    let order = state.workflow.get_order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// GET /orders — list orders with optional filters.
#[tracing::instrument(skip(state))]
pub async fn list<S, C, I>(
    State(state): State<Arc<AppState<S, C, I>>>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<OrderResponse>>, ApiError>
where
    S: OrderStore + CustomerStore + 'static,
    C: ProductCatalog + 'static,
    I: StockInventory + 'static,
{
    let orders = state.workflow.list_orders(&filter).await?;
    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// PATCH /orders/{id} — partially update a pending order.
#[tracing::instrument(skip(state, patch))]
pub async fn update<S, C, I>(
    State(state): State<Arc<AppState<S, C, I>>>,
    Path(id): Path<String>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<OrderResponse>, ApiError>
where
    S: OrderStore + CustomerStore + 'static,
    C: ProductCatalog + 'static,
    I: StockInventory + 'static,
{
    let order_id = parse_order_id(&id)?;
    let order = state.workflow.update_order(order_id, patch).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// DELETE /orders/{id} — delete an order and its items.
#[tracing::instrument(skip(state))]
pub async fn delete<S, C, I>(
    State(state): State<Arc<AppState<S, C, I>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    S: OrderStore + CustomerStore + 'static,
    C: ProductCatalog + 'static,
    I: StockInventory + 'static,
{
    let order_id = parse_order_id(&id)?;
    state.workflow.delete_order(order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
