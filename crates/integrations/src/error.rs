use common::Sku;
use thiserror::Error;

use crate::inventory::CenterStock;

/// The collaborator service a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    Catalog,
    Inventory,
}

impl Collaborator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collaborator::Catalog => "catalog",
            Collaborator::Inventory => "inventory",
        }
    }
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised by collaborator lookups.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    /// The catalog has no product with this SKU.
    #[error("Product with SKU '{sku}' not found in catalog")]
    ProductNotFound { sku: Sku },

    /// No distribution center can satisfy the requested quantity.
    ///
    /// Carries the quantities and the evaluated centers so the caller
    /// can report exactly what was missing.
    #[error(
        "Insufficient stock for product '{sku}'. Required: {requested}, Available: {available}"
    )]
    InsufficientStock {
        sku: Sku,
        requested: u32,
        available: i64,
        centers: Vec<CenterStock>,
    },

    /// The collaborator timed out or could not be reached.
    #[error("{collaborator} service unavailable: {reason}")]
    Unavailable {
        collaborator: Collaborator,
        reason: String,
    },
}

impl IntegrationError {
    pub(crate) fn from_request_error(collaborator: Collaborator, err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "cannot connect".to_string()
        } else {
            err.to_string()
        };
        IntegrationError::Unavailable {
            collaborator,
            reason,
        }
    }
}
