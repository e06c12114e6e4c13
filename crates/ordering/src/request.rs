//! Typed order creation request.

use common::{CustomerId, SellerId};
use domain::{LineItemInput, PaymentMethod, PaymentTerms};
use serde::Deserialize;

/// A proposed order as submitted by a client.
///
/// Required fields are still `Option` here so that their absence is
/// reported by the validator chain as a field-level error instead of a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Option<CustomerId>,
    pub seller_id: Option<SellerId>,
    pub seller_name: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
    pub payment_terms: Option<PaymentTerms>,
    pub payment_method: Option<PaymentMethod>,
    pub delivery_address: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_department: Option<String>,
    pub preferred_distribution_center: Option<String>,
    pub notes: Option<String>,
}
