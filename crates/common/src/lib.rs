//! Shared identifier types used across the sales order service.

mod types;

pub use types::{CustomerId, OrderId, SellerId, Sku};
