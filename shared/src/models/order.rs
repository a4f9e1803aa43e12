//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
///
/// `pending -> approved -> completed`; no other transition is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    Pending,
    Approved,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Completed => "completed",
        }
    }

    /// Whether `self -> next` is a legal lifecycle step
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Approved, Self::Completed)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Line item with the dish name and price captured when the order was placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub dish_id: i64,
    pub quantity: i32,
    pub dish_name: String,
    pub dish_price: f64,
}

/// Order entity (订单)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub table_id: i64,
    pub customer_phone: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<LineItem>,
    /// Order subtotal (Σ price × quantity of `items`)
    pub total_amount: f64,
    pub tax_amount: f64,
    /// Table subtotal at approval time
    pub bill_amount: Option<f64>,
    /// Table total including tax at approval time
    pub final_amount: Option<f64>,
    /// Table bill this order was approved under
    pub bill_id: Option<i64>,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

/// One requested dish in a customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub dish_id: i64,
    pub quantity: i32,
}

/// Place order payload (customer side)
///
/// Prices are never taken from the client; the server snapshots them from
/// the dish rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_id: i64,
    pub customer_phone: String,
    pub items: Vec<OrderItemInput>,
}

/// Staff order listing filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub table_id: Option<i64>,
}
