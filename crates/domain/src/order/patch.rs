//! Post-creation edit payloads.
//!
//! [`OrderPatch`] is the allow-list of mutable order fields: it is the
//! only shape an edit payload is read into, so immutable fields
//! (customer, seller, order number, timestamps, computed totals) present
//! in a payload are dropped at deserialization and never reach
//! persistence logic. Dropping them is deliberate and silent.

use common::Sku;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Order, OrderStatus, PaymentMethod, PaymentTerms};

/// Pricing-relevant inputs for one line item, as supplied by a client.
///
/// Used both when creating an order and when replacing its item list in
/// an edit. Name, price, and fulfillment center are never taken from the
/// client; they are resolved against the catalog and inventory
/// collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub product_sku: Sku,
    pub quantity: u32,
    /// Defaults to 0 when absent.
    pub discount_percentage: Option<Decimal>,
    /// Defaults to 19 when absent.
    pub tax_percentage: Option<Decimal>,
}

/// Partial update for an order.
///
/// Every field is optional; absent fields leave the order untouched.
/// `status` is applied only after the state machine admits the
/// transition, and `items` always replaces the entire item list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub payment_terms: Option<PaymentTerms>,
    pub payment_method: Option<PaymentMethod>,
    pub delivery_address: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_department: Option<String>,
    pub preferred_distribution_center: Option<String>,
    pub notes: Option<String>,
    pub items: Option<Vec<LineItemInput>>,
}

impl OrderPatch {
    /// Returns true if the patch carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self == &OrderPatch::default()
    }

    /// Merges the scalar (non-status, non-item) fields into the order.
    ///
    /// Status transitions and item replacement have their own gates and
    /// are applied by the workflow, not here.
    pub fn apply_scalars(&self, order: &mut Order) {
        if let Some(terms) = self.payment_terms {
            order.payment_terms = terms;
        }
        if let Some(method) = self.payment_method {
            order.payment_method = Some(method);
        }
        if let Some(ref address) = self.delivery_address {
            order.delivery_address = Some(address.clone());
        }
        if let Some(ref city) = self.delivery_city {
            order.delivery_city = Some(city.clone());
        }
        if let Some(ref department) = self.delivery_department {
            order.delivery_department = Some(department.clone());
        }
        if let Some(ref center) = self.preferred_distribution_center {
            order.preferred_distribution_center = Some(center.clone());
        }
        if let Some(ref notes) = self.notes {
            order.notes = Some(notes.clone());
        }
    }
}
