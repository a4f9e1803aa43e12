//! Tax Configuration Model

use serde::{Deserialize, Serialize};

/// Tax configuration entry (税率)
///
/// Only active entries take part in bill computation, applied in
/// `sort_order` then `id` order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TaxConfig {
    pub id: i64,
    pub name: String,
    /// Percentage of the subtotal (18.0 means 18%)
    pub percentage: f64,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Create tax payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxConfigCreate {
    pub name: String,
    pub percentage: f64,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Update tax payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxConfigUpdate {
    pub name: Option<String>,
    pub percentage: Option<f64>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}
