//! Order aggregate and line items.

use chrono::{DateTime, Utc};
use common::{CustomerId, OrderId, SellerId, Sku};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::{self, AmountError, LineTotals};

use super::{OrderError, OrderStatus, PaymentMethod, PaymentTerms};

/// One product-quantity entry within an order.
///
/// Product name and unit price are snapshots taken from the catalog at
/// creation time; they do not follow later catalog changes. The derived
/// monetary fields are computed, never set directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// Surrogate line item identifier.
    pub id: Uuid,

    /// The product being ordered.
    pub product_sku: Sku,

    /// Product display name, snapshotted at creation time.
    pub product_name: String,

    /// Quantity ordered (always positive).
    pub quantity: u32,

    /// Unit price, snapshotted at creation time.
    pub unit_price: Decimal,

    /// Discount percentage in [0, 100].
    pub discount_percentage: Decimal,

    /// Tax percentage in [0, 100].
    pub tax_percentage: Decimal,

    /// unit_price × quantity.
    pub subtotal: Decimal,

    /// Discount applied to the subtotal.
    pub discount_amount: Decimal,

    /// Tax applied to the discounted subtotal.
    pub tax_amount: Decimal,

    /// subtotal − discount_amount + tax_amount.
    pub total: Decimal,

    /// Distribution center selected to fulfill this line.
    pub distribution_center_code: Option<String>,

    /// Whether a distribution center reported sufficient stock when the
    /// order was created.
    pub stock_confirmed: bool,

    /// When the stock check was performed.
    pub stock_confirmation_date: Option<DateTime<Utc>>,
}

impl OrderLineItem {
    /// Builds a line item with its monetary figures computed from the
    /// pricing inputs.
    pub fn priced(
        product_sku: Sku,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
        discount_percentage: Decimal,
        tax_percentage: Decimal,
    ) -> Result<Self, AmountError> {
        let totals = money::line_totals(unit_price, quantity, discount_percentage, tax_percentage)?;

        Ok(Self {
            id: Uuid::new_v4(),
            product_sku,
            product_name: product_name.into(),
            quantity,
            unit_price,
            discount_percentage,
            tax_percentage,
            subtotal: totals.subtotal,
            discount_amount: totals.discount_amount,
            tax_amount: totals.tax_amount,
            total: totals.total,
            distribution_center_code: None,
            stock_confirmed: false,
            stock_confirmation_date: None,
        })
    }

    /// Records the outcome of the stock check on this line.
    pub fn with_reservation(
        mut self,
        distribution_center_code: impl Into<String>,
        confirmed: bool,
        checked_at: DateTime<Utc>,
    ) -> Self {
        self.distribution_center_code = Some(distribution_center_code.into());
        self.stock_confirmed = confirmed;
        self.stock_confirmation_date = Some(checked_at);
        self
    }

    /// Returns the line's computed figures.
    pub fn totals(&self) -> LineTotals {
        LineTotals {
            subtotal: self.subtotal,
            discount_amount: self.discount_amount,
            tax_amount: self.tax_amount,
            total: self.total,
        }
    }
}

/// Order aggregate root.
///
/// Owns its line items; all multi-row persistence of an order happens as
/// a unit. Monetary totals are derived from the items and recomputed
/// whenever the item list changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,

    /// Human-readable order number (`ORD-YYYYMMDD-NNNN`), assigned by
    /// the store when the order is first persisted.
    pub order_number: String,

    /// Customer who placed the order.
    pub customer_id: CustomerId,

    /// Salesperson who captured the order.
    pub seller_id: SellerId,

    /// Seller display name, snapshotted at creation time for audit
    /// stability.
    pub seller_name: String,

    /// When the order was placed.
    pub order_date: DateTime<Utc>,

    /// Current lifecycle status.
    pub status: OrderStatus,

    /// Sum of item subtotals.
    pub subtotal: Decimal,

    /// Sum of item discounts.
    pub discount_amount: Decimal,

    /// Sum of item taxes.
    pub tax_amount: Decimal,

    /// subtotal − discount_amount + tax_amount.
    pub total_amount: Decimal,

    /// Agreed payment terms.
    pub payment_terms: PaymentTerms,

    /// How the customer pays, if known.
    pub payment_method: Option<PaymentMethod>,

    pub delivery_address: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_department: Option<String>,

    /// Distribution center the customer prefers for fulfillment.
    pub preferred_distribution_center: Option<String>,

    /// Free-text notes.
    pub notes: Option<String>,

    /// Line items (never empty for a persisted order).
    pub items: Vec<OrderLineItem>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns true if non-status fields may still be edited.
    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }

    /// Fails unless the order is still open to edits.
    pub fn ensure_editable(&self) -> Result<(), OrderError> {
        if !self.is_editable() {
            return Err(OrderError::NotEditable {
                status: self.status,
            });
        }
        Ok(())
    }

    /// Moves the order to `next` if the transition table allows it.
    pub fn transition_status(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Replaces the whole item list and recomputes the order totals.
    ///
    /// Items are always replaced wholesale; there is no per-item merge.
    pub fn replace_items(&mut self, items: Vec<OrderLineItem>) {
        self.items = items;
        self.recompute_totals();
    }

    /// Recomputes the order-level totals from the current items.
    pub fn recompute_totals(&mut self) {
        let line_totals: Vec<_> = self.items.iter().map(OrderLineItem::totals).collect();
        let totals = money::order_totals(line_totals.iter());
        self.subtotal = totals.subtotal;
        self.discount_amount = totals.discount_amount;
        self.tax_amount = totals.tax_amount;
        self.total_amount = totals.total_amount;
    }

    /// Returns the total quantity across all items.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
