//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// Transitions reachable through the edit path:
/// ```text
/// Pending ──┬──► Pending    (re-save with new field values)
///           └──► Confirmed
/// ```
/// Every other status is reached by downstream fulfillment systems and
/// is closed to edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order has been created and is still editable.
    #[default]
    Pending,

    /// Order has been confirmed by the seller.
    Confirmed,

    /// Order is being picked and packed.
    Processing,

    /// Order has left a distribution center.
    Shipped,

    /// Order has been delivered to the customer.
    Delivered,

    /// Order was cancelled.
    Cancelled,
}

impl OrderStatus {
    /// Statuses reachable from `self` through the edit path.
    ///
    /// The table is deliberately explicit: anything not listed here is
    /// rejected, including every transition out of a non-pending status.
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Pending, OrderStatus::Confirmed],
            OrderStatus::Confirmed
            | OrderStatus::Processing
            | OrderStatus::Shipped
            | OrderStatus::Delivered
            | OrderStatus::Cancelled => &[],
        }
    }

    /// Returns true if an edit may move the order from `self` to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Returns true if non-status fields (address, payment terms, notes,
    /// items) may still be edited.
    pub fn is_editable(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a wire name back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn default_status_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn pending_allows_resave_and_confirm_only() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));

        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn non_pending_statuses_allow_no_transitions() {
        for from in ALL.iter().filter(|s| **s != OrderStatus::Pending) {
            for to in ALL {
                assert!(
                    !from.can_transition_to(to),
                    "{from} -> {to} should be rejected"
                );
            }
        }
    }

    #[test]
    fn only_pending_is_editable() {
        for status in ALL {
            assert_eq!(status.is_editable(), status == OrderStatus::Pending);
        }
    }

    #[test]
    fn serializes_to_lowercase_wire_names() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");

        let status: OrderStatus = serde_json::from_str("\"confirmed\"").unwrap();
        assert_eq!(status, OrderStatus::Confirmed);
    }

    #[test]
    fn display_matches_wire_name() {
        for status in ALL {
            assert_eq!(status.to_string(), status.as_str());
        }
    }
}
