//! Order aggregate and related types.

mod aggregate;
mod patch;
mod payment;
mod status;

pub use aggregate::{Order, OrderLineItem};
pub use patch::{LineItemInput, OrderPatch};
pub use payment::{PaymentMethod, PaymentTerms};
pub use status::OrderStatus;

use thiserror::Error;

/// Business-rule violations on an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Non-status fields may only change while the order is pending.
    #[error("Order in {status} status cannot be edited (only pending orders can)")]
    NotEditable { status: OrderStatus },

    /// The requested status change is not in the transition table.
    #[error(
        "Invalid status transition: '{from}' -> '{to}'. Allowed transitions: {}",
        format_allowed(.from)
    )]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// An order must always have at least one item.
    #[error("Order must have at least one item")]
    NoItems,
}

fn format_allowed(from: &OrderStatus) -> String {
    let allowed = from.allowed_transitions();
    if allowed.is_empty() {
        "none".to_string()
    } else {
        allowed
            .iter()
            .map(OrderStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_error_names_attempt_and_alternatives() {
        let err = OrderError::InvalidStatusTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Cancelled,
        };
        let msg = err.to_string();
        assert!(msg.contains("'pending' -> 'cancelled'"));
        assert!(msg.contains("pending, confirmed"));
    }

    #[test]
    fn transition_error_from_closed_status_says_none() {
        let err = OrderError::InvalidStatusTransition {
            from: OrderStatus::Confirmed,
            to: OrderStatus::Shipped,
        };
        assert!(err.to_string().contains("Allowed transitions: none"));
    }
}
