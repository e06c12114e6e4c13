//! Structural validation of order requests.
//!
//! Validation is an ordered list of pure functions over the typed
//! request. The chain runs to the first failure, before any remote
//! call, so malformed requests never cost a collaborator round trip.

use domain::LineItemInput;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::request::CreateOrderRequest;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A structural problem with an order request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field 'customer_id' is required")]
    MissingCustomerId,

    #[error("Field 'seller_id' is required")]
    MissingSellerId,

    #[error("Order must have at least one item")]
    NoItems,

    #[error("Item at index {index}: product_sku cannot be empty")]
    BlankSku { index: usize },

    #[error("Item at index {index}: quantity must be greater than 0")]
    InvalidQuantity { index: usize },

    #[error("Item at index {index}: discount_percentage must be between 0 and 100")]
    DiscountOutOfRange { index: usize },

    #[error("Item at index {index}: tax_percentage must be between 0 and 100")]
    TaxOutOfRange { index: usize },
}

type Validator = fn(&CreateOrderRequest) -> Result<(), ValidationError>;

/// The validator chain, run in order; the first failure aborts.
const VALIDATORS: &[Validator] = &[
    require_customer,
    require_seller,
    require_items,
    check_items,
];

/// Runs the full validator chain over a creation request.
pub fn validate(request: &CreateOrderRequest) -> Result<(), ValidationError> {
    for validator in VALIDATORS {
        validator(request)?;
    }
    Ok(())
}

fn require_customer(request: &CreateOrderRequest) -> Result<(), ValidationError> {
    if request.customer_id.is_none() {
        return Err(ValidationError::MissingCustomerId);
    }
    Ok(())
}

fn require_seller(request: &CreateOrderRequest) -> Result<(), ValidationError> {
    match request.seller_id {
        Some(ref seller) if !seller.is_empty() => Ok(()),
        _ => Err(ValidationError::MissingSellerId),
    }
}

fn require_items(request: &CreateOrderRequest) -> Result<(), ValidationError> {
    if request.items.is_empty() {
        return Err(ValidationError::NoItems);
    }
    Ok(())
}

fn check_items(request: &CreateOrderRequest) -> Result<(), ValidationError> {
    validate_items(&request.items)
}

/// Validates a list of line item inputs.
///
/// Also used on updates, where a supplied item list replaces the whole
/// existing one and must satisfy the same rules.
pub fn validate_items(items: &[LineItemInput]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::NoItems);
    }

    for (index, item) in items.iter().enumerate() {
        if item.product_sku.is_blank() {
            return Err(ValidationError::BlankSku { index });
        }
        if item.quantity == 0 {
            return Err(ValidationError::InvalidQuantity { index });
        }
        if let Some(discount) = item.discount_percentage
            && (discount < Decimal::ZERO || discount > HUNDRED)
        {
            return Err(ValidationError::DiscountOutOfRange { index });
        }
        if let Some(tax) = item.tax_percentage
            && (tax < Decimal::ZERO || tax > HUNDRED)
        {
            return Err(ValidationError::TaxOutOfRange { index });
        }
    }

    Ok(())
}
