//! Realtime messages pushed to customers
//!
//! Sent as JSON text frames over `/api/realtime/orders`.

use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderStatus};

/// Status change of one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusEvent {
    pub order_id: i64,
    pub table_id: i64,
    pub customer_phone: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub final_amount: Option<f64>,
    /// Epoch milliseconds
    pub at: i64,
}

impl OrderStatusEvent {
    pub fn from_order(order: &Order, at: i64) -> Self {
        Self {
            order_id: order.id,
            table_id: order.table_id,
            customer_phone: order.customer_phone.clone(),
            status: order.status,
            total_amount: order.total_amount,
            final_amount: order.final_amount,
            at,
        }
    }
}

/// Frame sent to a realtime subscriber
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RealtimeMessage {
    /// Current orders of the subscriber, sent on connect and after a lag
    Snapshot { orders: Vec<Order> },
    OrderUpdated(OrderStatusEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_message_tagging() {
        let msg = RealtimeMessage::OrderUpdated(OrderStatusEvent {
            order_id: 1,
            table_id: 5,
            customer_phone: "9845012345".into(),
            status: OrderStatus::Approved,
            total_amount: 1700.0,
            final_amount: Some(4802.6),
            at: 0,
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "order_updated");
        assert_eq!(json["data"]["status"], "approved");

        let json = serde_json::to_value(RealtimeMessage::Snapshot { orders: vec![] }).unwrap();
        assert_eq!(json["type"], "snapshot");
        assert!(json["data"]["orders"].as_array().unwrap().is_empty());
    }
}
