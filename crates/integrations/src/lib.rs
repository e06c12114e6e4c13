//! Clients for the remote collaborator services consulted during order
//! creation: the product catalog and the stock/inventory ledger.
//!
//! Each collaborator is modeled as a trait with an HTTP implementation
//! (bounded timeout, typed failures) and an in-memory implementation for
//! tests. Collaborator failures are never silently defaulted; callers
//! decide what an unavailable catalog or ledger means for them.

mod catalog;
mod error;
mod inventory;

pub use catalog::{HttpProductCatalog, InMemoryProductCatalog, Product, ProductCatalog};
pub use error::{Collaborator, IntegrationError};
pub use inventory::{
    CenterStock, HttpStockInventory, InMemoryStockInventory, StockInventory, StockReservation,
};

/// Default timeout applied to every collaborator request.
pub const DEFAULT_COLLABORATOR_TIMEOUT_SECS: u64 = 3;
