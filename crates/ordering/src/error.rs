use common::{CustomerId, OrderId, Sku};
use domain::{AmountError, OrderError};
use integrations::IntegrationError;
use order_store::StoreError;
use thiserror::Error;

use crate::validate::ValidationError;

/// Errors surfaced by the order workflow.
///
/// Every variant keeps its cause typed so the API layer can map it to
/// the right status code without string matching.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The request failed structural validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced customer does not exist.
    #[error("Customer with ID {0} not found")]
    CustomerNotFound(CustomerId),

    /// The referenced customer exists but is inactive.
    #[error("Customer {0} is not active")]
    CustomerInactive(String),

    /// The product resolved but is not sellable.
    #[error("Product '{sku}' is not active")]
    InactiveProduct { sku: Sku },

    /// The order does not exist.
    #[error("Order with id {0} not found")]
    OrderNotFound(OrderId),

    /// A business rule on the order was violated.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Pricing inputs were out of range.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// A collaborator lookup failed.
    #[error(transparent)]
    Integration(#[from] IntegrationError),

    /// Persistence failed.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::OrderNotFound(id) => WorkflowError::OrderNotFound(id),
            other => WorkflowError::Store(other),
        }
    }
}
