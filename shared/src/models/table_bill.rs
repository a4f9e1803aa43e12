//! Table Bill Model

use serde::{Deserialize, Serialize};

/// One tax applied to a table bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub name: String,
    pub percentage: f64,
    pub amount: f64,
}

/// Frozen record of an approved table bill (整桌账单)
///
/// Written in the same transaction that approves the orders; invoices read
/// their totals from here so later tax changes never alter a past bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TableBill {
    pub id: i64,
    pub table_id: i64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub order_ids: Vec<i64>,
    pub subtotal: f64,
    pub total_tax: f64,
    pub final_amount: f64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub breakdown: Vec<TaxLine>,
    /// Phone or username of the approving staff member
    pub approved_by: String,
    pub created_at: i64,
}

/// Bill computation before approval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillPreview {
    pub table_id: i64,
    pub order_ids: Vec<i64>,
    pub subtotal: f64,
    pub total_tax: f64,
    pub final_amount: f64,
    pub breakdown: Vec<TaxLine>,
}

/// Approve request body
///
/// Without `order_ids` every pending order of the table is approved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApproveBillRequest {
    pub order_ids: Option<Vec<i64>>,
}
