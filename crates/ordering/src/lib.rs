//! The order reconciliation workflow.
//!
//! Order creation validates the request, gates it on the customer
//! record, resolves every line item against the product catalog and the
//! stock ledger, prices the result, and persists the aggregate in one
//! transaction — or fails with the first error and persists nothing.
//! Updates run the same per-item resolution for replaced items, behind
//! the order state machine.

mod error;
mod request;
mod validate;
mod workflow;

pub use error::WorkflowError;
pub use request::CreateOrderRequest;
pub use validate::ValidationError;
pub use workflow::OrderWorkflow;
