//! Order domain model for the sales order service.
//!
//! Pure domain logic with no I/O: fixed-precision pricing arithmetic,
//! the order aggregate, the status state machine, and the patch
//! allow-list for post-creation edits.

pub mod money;
pub mod order;

pub use money::{AmountError, LineTotals, OrderTotals, DEFAULT_TAX_PERCENTAGE};
pub use order::{
    LineItemInput, Order, OrderError, OrderLineItem, OrderPatch, OrderStatus, PaymentMethod,
    PaymentTerms,
};
