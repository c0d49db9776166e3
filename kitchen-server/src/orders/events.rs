//! Queue events
//!
//! Broadcast after each committed change so listeners (event logger,
//! push channels) never see a change that readers cannot yet observe.

use serde::{Deserialize, Serialize};
use shared::models::{Notification, OrderId, OrderStatus, QueuedOrder};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueueEvent {
    OrderPlaced {
        order: QueuedOrder,
    },
    StatusChanged {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },
    NotificationEmitted {
        notification: Notification,
    },
    OrderCompleted {
        order_id: OrderId,
    },
}

impl QueueEvent {
    pub fn order_id(&self) -> OrderId {
        match self {
            Self::OrderPlaced { order } => order.order_id,
            Self::StatusChanged { order_id, .. } | Self::OrderCompleted { order_id } => *order_id,
            Self::NotificationEmitted { notification } => notification.order_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OrderPlaced { .. } => "order_placed",
            Self::StatusChanged { .. } => "status_changed",
            Self::NotificationEmitted { .. } => "notification_emitted",
            Self::OrderCompleted { .. } => "order_completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_is_tagged() {
        let event = QueueEvent::StatusChanged {
            order_id: 3,
            from: OrderStatus::Queued,
            to: OrderStatus::Cooking,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "status_changed");
        assert_eq!(json["to"], "cooking");
        assert_eq!(event.order_id(), 3);
        assert_eq!(event.name(), "status_changed");
    }
}
